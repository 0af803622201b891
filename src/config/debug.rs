//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every use is further gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit a line for every poll tick (cache hit, fetch started, skipped).
    pub print_poll_ticks: bool,
    /// Emit fetch results (item counts, HTTP failures) as they arrive.
    pub print_fetch_results: bool,
    /// Emit tooltip binding decisions while the list is rebuilt.
    pub print_tooltip_bindings: bool,
    /// Emit background lifecycle events (creation, resize, teardown).
    pub print_background_lifecycle: bool,
    /// Emit per-frame particle statistics (rebounds, agitated particles).
    pub print_particle_stats: bool,
    /// Emit UI interaction logs (manual refresh, toggles).
    pub print_ui_interactions: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_poll_ticks: false,
    print_fetch_results: true,
    print_tooltip_bindings: false,
    print_background_lifecycle: true,
    print_particle_stats: false,
    print_ui_interactions: true,
    print_shutdown: false,
};

use eframe::egui::{Id, Pos2, Rect, Vec2};
use std::collections::BTreeSet;

use crate::background::BackgroundError;

/// Identity of a rendering surface attached to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub Id);

/// Which host events a component has subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    Resize,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerEvent {
    Resized(Vec2),
    /// Pointer position in container-local points, `None` once it leaves
    PointerMoved(Option<Pos2>),
}

/// The screen region hosting the background.
///
/// Holds at most one attached surface and queues resize/pointer events for
/// whoever registered a listener. Events for kinds nobody listens to are
/// dropped on the floor.
#[derive(Debug)]
pub struct Container {
    rect: Rect,
    surface: Option<SurfaceId>,
    listeners: BTreeSet<ListenerKind>,
    pending: Vec<ContainerEvent>,
    last_pointer: Option<Pos2>,
}

impl Container {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            surface: None,
            listeners: BTreeSet::new(),
            pending: Vec::new(),
            last_pointer: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }

    /// A container we can draw into: finite and with a non-empty area.
    pub fn is_displayable(&self) -> bool {
        let size = self.rect.size();
        self.rect.min.x.is_finite()
            && self.rect.min.y.is_finite()
            && size.x.is_finite()
            && size.y.is_finite()
            && size.x > 0.0
            && size.y > 0.0
    }

    /// Host side: the region moved or changed size this frame.
    pub fn set_rect(&mut self, rect: Rect) {
        let resized = rect.size() != self.rect.size();
        self.rect = rect;
        if resized && self.listeners.contains(&ListenerKind::Resize) {
            self.pending.push(ContainerEvent::Resized(rect.size()));
        }
    }

    /// Host side: pointer position in screen points, `None` if outside.
    pub fn pointer_moved(&mut self, screen_pos: Option<Pos2>) {
        let local = screen_pos
            .filter(|pos| self.rect.contains(*pos))
            .map(|pos| (pos - self.rect.min).to_pos2());

        if local == self.last_pointer {
            return;
        }
        self.last_pointer = local;

        if self.listeners.contains(&ListenerKind::Pointer) {
            self.pending.push(ContainerEvent::PointerMoved(local));
        }
    }

    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.pending)
    }

    /// A new pointer listener is told where the pointer already is, since a
    /// resting pointer produces no further moves.
    pub fn add_listener(&mut self, kind: ListenerKind) {
        let added = self.listeners.insert(kind);
        if added && kind == ListenerKind::Pointer && self.last_pointer.is_some() {
            self.pending.push(ContainerEvent::PointerMoved(self.last_pointer));
        }
    }

    pub fn remove_listener(&mut self, kind: ListenerKind) -> bool {
        self.pending.retain(|event| listener_for(event) != kind);
        self.listeners.remove(&kind)
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn attach_surface(&mut self, surface: SurfaceId) -> Result<(), BackgroundError> {
        if self.surface.is_some() {
            return Err(BackgroundError::SurfaceAlreadyAttached);
        }
        self.surface = Some(surface);
        Ok(())
    }

    pub fn detach_surface(&mut self, surface: SurfaceId) -> Result<(), BackgroundError> {
        match self.surface {
            Some(current) if current == surface => {
                self.surface = None;
                Ok(())
            }
            _ => Err(BackgroundError::SurfaceNotAttached),
        }
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }
}

fn listener_for(event: &ContainerEvent) -> ListenerKind {
    match event {
        ContainerEvent::Resized(_) => ListenerKind::Resize,
        ContainerEvent::PointerMoved(_) => ListenerKind::Pointer,
    }
}

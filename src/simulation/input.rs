//! Pointer and viewport providers injected into the simulator
//!
//! The simulator never reads global window state. Front ends hand it a
//! `PointerSource` and a `ViewportSource` at construction and keep writing
//! to their side of the provider as events arrive. `SharedInput` is the
//! stock implementation of both: a cloneable handle over one `InputState`.

use std::sync::{Arc, RwLock};

use crate::simulation::states::NVec2;

/// Current pointer position in screen pixels, `None` when the pointer is
/// outside the surface
pub trait PointerSource {
    fn pointer(&self) -> Option<NVec2>;
}

/// Current viewport size (width, height) in screen pixels
pub trait ViewportSource {
    fn viewport(&self) -> NVec2;
}

#[derive(Debug, Clone, Copy)]
pub struct InputState {
    pub pointer: Option<NVec2>,
    pub viewport: NVec2,
}

#[derive(Debug, Clone)]
pub struct SharedInput {
    state: Arc<RwLock<InputState>>,
}

impl SharedInput {
    pub fn new(viewport: NVec2) -> Self {
        Self {
            state: Arc::new(RwLock::new(InputState {
                pointer: None,
                viewport,
            })),
        }
    }

    pub fn set_pointer(&self, pointer: Option<NVec2>) {
        self.write(|s| s.pointer = pointer.filter(|p| p.iter().all(|c| c.is_finite())));
    }

    pub fn set_viewport(&self, viewport: NVec2) {
        if viewport.iter().all(|c| c.is_finite() && *c >= 0.0) {
            self.write(|s| s.viewport = viewport);
        }
    }

    pub fn snapshot(&self) -> InputState {
        // A poisoned lock still holds a usable plain-data snapshot
        match self.state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn write(&self, f: impl FnOnce(&mut InputState)) {
        match self.state.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl PointerSource for SharedInput {
    fn pointer(&self) -> Option<NVec2> {
        self.snapshot().pointer
    }
}

impl ViewportSource for SharedInput {
    fn viewport(&self) -> NVec2 {
        self.snapshot().viewport
    }
}

/// Fixed-size viewport, for headless runs and benchmarks
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub NVec2);

impl ViewportSource for FixedViewport {
    fn viewport(&self) -> NVec2 {
        self.0
    }
}

/// Pointer that never appears
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPointer;

impl PointerSource for NoPointer {
    fn pointer(&self) -> Option<NVec2> {
        None
    }
}

use crate::view::Scene;

/// Where composed scenes go. The stage produces a `Scene` per frame; the
/// host hands it to whatever backend it was configured with (terminal,
/// recording, nothing).
pub trait RenderBackend {
    /// Called when the composed size changes, and once before the first
    /// `commit`.
    fn resize(&mut self, width: u32, height: u32);

    /// Presents one finished frame.
    fn commit(&mut self, scene: &Scene);
}

/// Discards every frame. For tests and timer-only sessions.
#[derive(Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn commit(&mut self, _scene: &Scene) {}
}

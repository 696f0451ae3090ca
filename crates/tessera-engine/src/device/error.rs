/// What the frame cycle should do after a failed surface acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may render normally.
    Reconfigured,
    /// Transient failure; drop this frame and try again on the next one.
    SkipFrame,
    /// Unrecoverable (commonly out of memory); the loop must stop.
    Fatal,
}

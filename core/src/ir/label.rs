use serde::Serialize;

/// Opaque jump target.
///
/// Jumps name a label before the label is placed, so a label is an identity
/// handed out by `FunctionBuilder::new_label`, not a position. Positions only
/// exist once the function is finalized (`IrFunction::position_of`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Label(u32);

impl Label {
    pub(crate) fn new(index: u32) -> Self {
        Label(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

//! Property dialog contract.

use glabels_core::LabelObject;
use std::rc::Rc;

/// A dialog that edits one label object's properties.
///
/// A binding owns at most one dialog. The binding calls [`load`] to push
/// the object's current state into the dialog; while it does so it holds
/// its sync guard, so edits the dialog applies back onto the object during
/// `load` do not bounce back into another `load`.
///
/// [`load`]: PropertyDialog::load
pub trait PropertyDialog {
    /// Make the dialog and all its pages visible.
    fn show_all(&mut self);

    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    /// Refresh every page from `object`.
    fn load(&mut self, object: &Rc<LabelObject>);
}

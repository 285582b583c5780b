/// Editable template content and the custom icon it owns.
pub mod template;

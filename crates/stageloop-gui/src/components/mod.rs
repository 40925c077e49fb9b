pub mod concepts_panel;
pub mod controls;
pub mod diagram_canvas;
pub mod node_editor;
pub mod status_bar;

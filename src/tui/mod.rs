pub mod detail_overlay;
pub mod footer;
pub mod header;
pub mod overview;
pub mod render;
pub mod settings;
pub mod sidebar;
pub mod spinner;
pub mod table;
pub mod theme;

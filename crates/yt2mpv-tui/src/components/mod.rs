pub mod control_bar;
pub mod help_overlay;
pub mod playlist_panel;

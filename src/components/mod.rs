pub mod team_panel;

pub mod property;
pub mod site_selection;

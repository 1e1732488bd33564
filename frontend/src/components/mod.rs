pub mod admin_devices;
pub mod admin_orgs;
pub mod admin_users;
pub mod chart_plotly;
pub mod dashboard;
pub mod filters;
pub mod guards;
pub mod kpi;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod search_bar;

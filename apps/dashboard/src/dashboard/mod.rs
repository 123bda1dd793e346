// Company dashboard view state: selection, status filter, single and bulk
// status updates. All of it is owned by one `DashboardController`.

pub mod controller;
pub mod filter;
pub mod notify;
pub mod selection;
pub mod updater;

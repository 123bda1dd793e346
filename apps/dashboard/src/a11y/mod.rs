// Accessibility helpers for the dashboard: screen reader announcements and
// keyboard focus confinement for the confirmation modal.

pub mod announcer;
pub mod focus_trap;

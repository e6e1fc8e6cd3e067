pub mod calendar;
pub mod reverse_convertible;
pub mod scenario;

/// Named easing curves.
pub mod ease;
/// Staggered entrance timeline.
pub mod entrance;

/// State of the screen shown while a narration request is in flight.
#[derive(Debug, Clone)]
pub struct LoadingState {
    pub(in crate::app) question: String,
    pub(in crate::app) category: String,
    pub(in crate::app) phase: LoadingPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingPhase {
    InFlight,
    Failed(String),
}

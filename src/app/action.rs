/// Side effects the event loop runs after the handler has updated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartAnimations,
    StopAnimations,
    Quit,
}

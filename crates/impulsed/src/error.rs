use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Profile(#[from] impulse_workspace::ProfileError),
    #[error(transparent)]
    Input(#[from] impulse_input::Error),
    #[error("{0} of {1} trace events failed")]
    ReplayFailed(usize, usize),
}

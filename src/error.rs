use thiserror::Error;

/// Failures while invoking the container engine binary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to launch `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{cmd}` exited with status {code}")]
    Exit { cmd: String, code: i32 },
}

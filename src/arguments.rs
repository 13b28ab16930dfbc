use std::{
    ffi::{OsStr, OsString},
    vec::Vec,
};

/// An owned copy of the process arguments, for the tokens to borrow from
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<OsString>,
}

impl LoadedArguments {
    pub fn from_env() -> Self {
        Self {
            arguments: std::env::args_os().collect(),
        }
    }

    /// The program name, as the process was invoked
    pub fn argv0(&self) -> Option<&OsStr> {
        self.arguments.first().map(OsString::as_os_str)
    }

    /// Every argument after the program name
    pub fn tokens(&self) -> impl Iterator<Item = &[u8]> {
        self.arguments
            .get(1..)
            .unwrap_or(&[])
            .iter()
            .map(|arg| arg.as_encoded_bytes())
    }
}

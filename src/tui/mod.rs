//! Console interaction: dialoguer prompts and status lines

pub mod prompts;

//! Deployer command-line construction.

/// Interpreter the phar is run under.
pub const PHP: &str = "php";

/// Everything that shapes the Deployer argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployerArguments {
    /// Command tokens, e.g. `["deploy", "production"]`.
    pub command: Vec<String>,
    pub ansi_output: bool,
    /// Flag-shaped token such as `-v`, passed through literally (even when empty).
    pub verbosity: String,
    /// `-o key=>value` pairs, in the order given.
    pub options: Vec<(String, String)>,
}

impl DeployerArguments {
    /// Arguments that follow the binary path.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = self.command.clone();
        args.push("--no-interaction".to_string());
        args.push(if self.ansi_output { "--ansi" } else { "--no-ansi" }.to_string());
        args.push(self.verbosity.clone());
        for (key, value) in &self.options {
            args.push("-o".to_string());
            args.push(format!("{key}=>{value}"));
        }
        args
    }
}

/// Full vector handed to the interpreter: `[binary, ...args]`.
#[must_use]
pub fn command_spec(binary: &str, args: &DeployerArguments) -> Vec<String> {
    let mut spec = Vec::with_capacity(args.command.len() + args.options.len() * 2 + 4);
    spec.push(binary.to_string());
    spec.extend(args.to_args());
    spec
}

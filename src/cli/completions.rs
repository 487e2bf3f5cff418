use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    svcdeb completions bash > ~/.bash_completion.d/svcdeb\n\n\
                  Generate zsh completions:\n    svcdeb completions zsh > ~/.zfunc/_svcdeb\n\n\
                  Generate fish completions:\n    svcdeb completions fish > ~/.config/fish/completions/svcdeb.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}

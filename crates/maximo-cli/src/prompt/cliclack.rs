use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use maximo_agent::models::message::{Message, MessageContent};

use super::prompt::{Input, InputType, Prompt, Theme};

pub struct CliclackPrompt {
    spinner: cliclack::ProgressBar,
    theme: Theme,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: spinner(),
            theme: Theme::Dark,
        }
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print_tool_request(content: &str, theme: &str, tool_name: &str) {
    bat::PrettyPrinter::new()
        .input(
            bat::Input::from_bytes(content.as_bytes()).name(format!("Tool Request: {}", tool_name)),
        )
        .theme(theme)
        .language("JSON")
        .grid(true)
        .header(true)
        .wrapping_mode(WrappingMode::Character)
        .print()
        .unwrap();
}

fn print_tool_response(content: &str, theme: &str) {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()).name("Tool Response:"))
        .theme(theme)
        .language("JSON")
        .grid(true)
        .header(true)
        .wrapping_mode(WrappingMode::Character)
        .print()
        .unwrap();
}

fn print(content: &str, theme: &str) {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .unwrap();
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, message: Box<Message>) {
        let theme = match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        };

        for message_content in &message.content {
            match message_content {
                MessageContent::Text(text) => print(&text.text, theme),
                MessageContent::ToolRequest(tool_request) => match &tool_request.tool_call {
                    Ok(call) => {
                        print_tool_request(
                            &serde_json::to_string_pretty(&call.arguments).unwrap(),
                            theme,
                            &call.name,
                        );
                    }
                    Err(e) => print(&e.to_string(), theme),
                },
                MessageContent::ToolResponse(tool_response) => match &tool_response.tool_result {
                    Ok(output) => {
                        let formatted = serde_json::to_string_pretty(output).unwrap();
                        print_tool_response(&formatted, theme);
                    }
                    Err(e) => print(&e.to_string(), theme),
                },
            }
        }

        println!();
    }

    fn get_input(&mut self) -> Result<Input> {
        let message_text: String = input("Message:")
            .placeholder("")
            .multiline()
            .interact()?;

        if message_text.trim().eq_ignore_ascii_case("exit")
            || message_text.trim().eq_ignore_ascii_case("quit")
        {
            return Ok(Input {
                input_type: InputType::Exit,
                content: None,
            });
        }

        if message_text.trim().is_empty() {
            return Ok(Input {
                input_type: InputType::AskAgain,
                content: None,
            });
        }

        Ok(Input {
            input_type: InputType::Message,
            content: Some(message_text.to_string()),
        })
    }

    fn show_busy(&self) {
        spinner().start("awaiting reply");
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn close(&self) {
        self.spinner.stop("");
    }
}

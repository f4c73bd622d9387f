use anyhow::Result;

use crate::bridge::BridgeClient;
use crate::conversation::Conversation;
use crate::prompt::prompt::{InputType, Prompt};
use crate::tools::{BridgeCall, ToolOutcome};
use maximo_agent::manifest::ToolDescriptor;
use maximo_agent::models::message::{Message, ToolRequest};
use maximo_agent::models::tool::Tool;
use maximo_agent::providers::base::Provider;

const SYSTEM_PROMPT: &str = "You are an assistant for IBM Maximo asset management. \
Use the get_asset tool to look up a single asset by its ID and the list_assets tool \
to browse or filter assets. Answer from the tool results; when no tool is needed, \
answer directly.";

/// An interactive chat session: reads user turns, relays model tool calls
/// to the bridge, and renders the model's final answer.
pub struct Session<'a> {
    provider: Box<dyn Provider + Send + Sync>,
    bridge: BridgeClient,
    prompt: Box<dyn Prompt + 'a>,
    manifest: Vec<ToolDescriptor>,
    tools: Vec<Tool>,
    conversation: Conversation,
}

impl<'a> Session<'a> {
    pub fn new(
        provider: Box<dyn Provider + Send + Sync>,
        bridge: BridgeClient,
        prompt: Box<impl Prompt + 'a>,
        manifest: Vec<ToolDescriptor>,
    ) -> Self {
        let tools = manifest.iter().map(ToolDescriptor::to_tool).collect();
        Session {
            provider,
            bridge,
            prompt,
            manifest,
            tools,
            conversation: Conversation::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = &input.content {
                        self.prompt.show_busy();
                        let result = self.process_message(content).await;
                        self.prompt.hide_busy();
                        result?;
                    }
                }
                InputType::Exit => break,
                InputType::AskAgain => continue,
            }
        }
        self.prompt.close();
        Ok(())
    }

    /// Process a single message and exit, for one-shot invocations
    pub async fn headless_start(&mut self, initial_message: String) -> Result<()> {
        self.process_message(&initial_message).await?;
        self.prompt.close();
        Ok(())
    }

    /// One full user turn. The model may answer directly, or issue tool
    /// calls; every call in a model turn is drained before the batched
    /// results go back, looping until the model answers with text.
    pub async fn process_message(&mut self, content: &str) -> Result<()> {
        self.conversation.push(Message::user().with_text(content));

        loop {
            let (response, _usage) = self
                .provider
                .complete(SYSTEM_PROMPT, self.conversation.messages(), &self.tools)
                .await?;

            let requests: Vec<ToolRequest> =
                response.tool_requests().into_iter().cloned().collect();

            if requests.is_empty() {
                self.prompt.render(Box::new(response.clone()));
                self.conversation.push(response);
                return Ok(());
            }

            // Dispatch every call before committing anything to the
            // conversation. A failure aborts the turn here, so the model
            // never sees a dangling request or an error-shaped result.
            let mut responses = Message::user();
            for request in &requests {
                let call = match &request.tool_call {
                    Ok(call) => call,
                    Err(e) => {
                        self.report_failure(e.to_string());
                        return Ok(());
                    }
                };
                let bridge_call = match BridgeCall::from_tool_call(&self.manifest, call) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        self.report_failure(e.to_string());
                        return Ok(());
                    }
                };
                match self.bridge.dispatch(&bridge_call).await {
                    ToolOutcome::Success(value) => {
                        responses = responses.with_tool_response(request.id.clone(), Ok(value));
                    }
                    ToolOutcome::Failure(reason) => {
                        self.report_failure(reason);
                        return Ok(());
                    }
                }
            }

            self.prompt.render(Box::new(response.clone()));
            self.conversation.push(response);
            self.prompt.render(Box::new(responses.clone()));
            self.conversation.push(responses);
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    fn report_failure(&mut self, reason: String) {
        self.prompt.render(Box::new(
            Message::assistant().with_text(format!("Tool call failed: {}", reason)),
        ));
    }
}

//! Phased command execution pipeline
//!
//! Every invocation runs the same fixed sequence: PRE interceptors, the
//! enable-state check, the source-type check, START interceptors, the command
//! body, POST interceptors. PRE and START abort on the first interceptor that
//! returns a result; POST always runs to completion and its results are
//! discarded. Async command bodies are handed to the host scheduler together
//! with the POST phase as a continuation, and the dispatch call returns
//! success to the caller without waiting.

use super::command::{Command, CommandFailure, CommandResult};
use super::interceptor::{Interceptor, Phase};
use super::source::{CommandArgs, CommandSource};
use super::store::CommandState;
use crate::host::Scheduler;
use crate::plugin::PluginContainer;
use std::sync::Arc;

/// Message shown when a disabled command is invoked
pub const DISABLED_MESSAGE: &str = "This command is currently disabled.";

/// Message shown when the command body fails unexpectedly
pub const FAILURE_MESSAGE: &str =
    "An error has occurred while attempting to execute this command.";

/// Executes resolved commands against invocation requests
pub struct CommandDispatcher {
    scheduler: Arc<dyn Scheduler>,
}

impl CommandDispatcher {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Run one invocation through the pipeline
    ///
    /// Never panics and never returns an error; every failure mode ends in a
    /// message to the source and a result for the host.
    pub fn execute(
        &self,
        command: &Arc<Command>,
        container: &Arc<PluginContainer>,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> CommandResult {
        let mut interceptors = container.interceptors_for(command.key());
        // Stable sort: priority ties keep insertion order.
        interceptors.sort_by_key(Interceptor::priority);

        if let Some(result) = run_phase(&interceptors, Phase::Pre, source, args) {
            return result;
        }

        if container.state(command.key()) == Some(CommandState::Disabled) {
            source.send_message(DISABLED_MESSAGE);
            return CommandResult::Empty;
        }

        let required = command.required_source();
        if !required.accepts(source.kind()) {
            source.send_message(required.mismatch_message());
            return CommandResult::Empty;
        }

        if let Some(result) = run_phase(&interceptors, Phase::Start, source, args) {
            return result;
        }

        if command.is_async() {
            let body_command = Arc::clone(command);
            let owner = container.id().to_string();
            let body_source = source.clone();
            let body_args = args.clone();

            let post: Vec<Interceptor> = interceptors
                .iter()
                .filter(|i| i.phase() == Phase::Post)
                .cloned()
                .collect();
            let post_source = source.clone();
            let post_args = args.clone();

            // POST is a continuation of the body task, which is what
            // guarantees it observes body completion, success or failure.
            self.scheduler.submit_async_then(
                Box::new(move || {
                    run_body(&body_command, &owner, &body_source, &body_args);
                }),
                Box::new(move || {
                    for interceptor in &post {
                        let _ = interceptor.run(&post_source, &post_args);
                    }
                }),
            );

            // Fire and forget: the caller is answered before the body runs.
            return CommandResult::Success;
        }

        let result = run_body(command, container.id(), source, args);
        for interceptor in interceptors.iter().filter(|i| i.phase() == Phase::Post) {
            let _ = interceptor.run(source, args);
        }
        result
    }
}

/// Run one abortable phase; `Some` is the first interceptor's stop result
fn run_phase(
    interceptors: &[Interceptor],
    phase: Phase,
    source: &CommandSource,
    args: &CommandArgs,
) -> Option<CommandResult> {
    for interceptor in interceptors.iter().filter(|i| i.phase() == phase) {
        if let Some(result) = interceptor.run(source, args) {
            return Some(result);
        }
    }
    None
}

/// Invoke the user-supplied body and reduce its failures to messages
fn run_body(
    command: &Command,
    owner: &str,
    source: &CommandSource,
    args: &CommandArgs,
) -> CommandResult {
    match command.executor().execute(source, args) {
        Ok(result) => result,
        Err(CommandFailure::Message(message)) => {
            source.send_message(&message);
            CommandResult::Empty
        }
        Err(CommandFailure::Internal(error)) => {
            tracing::error!(
                plugin = owner,
                command = command.key(),
                "Command execution failed: {:#}",
                error
            );
            source.send_message(FAILURE_MESSAGE);
            CommandResult::Empty
        }
    }
}

use ritual_core::{KeyInput, Outcome, StepController};
use shared::domain::Step;

pub const BACK_COMMAND: &str = ":back";
pub const SEAL_COMMAND: &str = ":seal";

const ENTER_HINT: &str = "CLIQUER POUR ENTRER";
const SEAL_LABEL: &str = "Sceller le destin";
const FINAL_SUB: &str = "Tes mots sont scellés dans le voile des ombres.";
const ACK_LABEL: &str = "Je vous ai compris";
const REJECTED_EMAIL: &str = "~ L'Oracle ne reconnaît pas cette adresse ~";

/// What one line of input means on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enter,
    Back,
    Seal,
    Acknowledge,
    Type(String),
    Append(String),
}

pub fn interpret(step: Step, line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    match step {
        Step::Intro => Command::Enter,
        Step::Complete => Command::Acknowledge,
        _ if line.trim() == BACK_COMMAND => Command::Back,
        Step::Message if line.trim() == SEAL_COMMAND => Command::Seal,
        Step::Message => Command::Append(line.to_string()),
        Step::Name | Step::Email | Step::Subject => Command::Type(line.to_string()),
    }
}

pub fn execute(controller: &mut StepController, command: Command) -> Outcome {
    match command {
        Command::Enter => controller.start(),
        Command::Acknowledge => controller.reset(),
        Command::Back => controller.retreat(),
        Command::Seal => controller.submit(),
        Command::Type(text) => {
            type_chars(controller, &text);
            controller.update_field(text);
            controller.handle_key(KeyInput::Enter)
        }
        Command::Append(text) => {
            type_chars(controller, &text);
            let mut message = controller.record().message.clone();
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(&text);
            controller.update_field(message);
            Outcome::Ignored
        }
    }
}

fn type_chars(controller: &mut StepController, text: &str) {
    for ch in text.chars() {
        controller.handle_key(KeyInput::Char(ch));
    }
}

/// Text shown after a line was handled, if the outcome deserves one.
pub fn notice(step: Step, outcome: Outcome) -> Option<&'static str> {
    match (step, outcome) {
        (Step::Email, Outcome::Held) => Some(REJECTED_EMAIL),
        _ => None,
    }
}

pub fn render(controller: &StepController) -> String {
    let step = controller.step();
    let mut screen = String::new();

    if let Some(label) = controller.back_label() {
        screen.push_str(&format!("  [{BACK_COMMAND}] {label}\n"));
    }

    match step {
        Step::Intro => {
            screen.push_str(&format!("\n  {}\n  ({ENTER_HINT})\n", step.prompt()));
        }
        Step::Name | Step::Email | Step::Subject => {
            screen.push_str(&format!("\n  {}\n> ", step.prompt()));
        }
        Step::Message => {
            screen.push_str(&format!(
                "\n  {}\n  [{SEAL_COMMAND}] {SEAL_LABEL}\n",
                step.prompt()
            ));
            let message = &controller.record().message;
            if !message.is_empty() {
                for line in message.lines() {
                    screen.push_str(&format!("  | {line}\n"));
                }
            }
            screen.push_str("> ");
        }
        Step::Complete => {
            screen.push_str(&format!(
                "\n  {}\n  {FINAL_SUB}\n  ({ACK_LABEL})\n",
                step.prompt()
            ));
        }
    }

    screen
}

//! Line-oriented shell grammar.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use client_core::pages::advisory::QUICK_ACTIONS;
use shared::{
    domain::{CropFilter, LoginField, PreferenceToggle, SignupField},
    protocol::UserAction,
};

pub const HELP: &str = "\
commands:
  go <path>                                    open a route
  login <id> <password>                        sign in
  signup <name> <email> <phone> <password> <state> <language>
  logout
  chat <text>                                  ask the advisor
  quick <n>                                    use quick action n (1-4)
  upload <file>                                send a crop photo for detection
  remove                                       clear the uploaded photo
  filter <soil|region|season> <value>
  recommend                                    get crop recommendations
  plan <crop>                                  add a recommended crop to the plan
  post <text>                                  publish to the forum
  like <n>                                     toggle like on post n
  feature <title>                              open a dashboard card
  pref <notifications|offline> <on|off>
  nav | state | wait | help | quit
quote arguments that contain spaces: signup \"Meena Devi\" ...";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Actions(Vec<UserAction>),
    Upload(PathBuf),
    Nav,
    State,
    Wait,
    Help,
    Quit,
}

/// Blank lines and `#` comments parse to `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args = split_args(rest)?;

    let command = match name.to_ascii_lowercase().as_str() {
        "go" => {
            let [path] = expect_args::<1>(name, &args)?;
            action(UserAction::Navigate { path })
        }
        "login" => {
            let [identifier, password] = expect_args::<2>(name, &args)?;
            Command::Actions(vec![
                UserAction::SetLoginField {
                    field: LoginField::Identifier,
                    value: identifier,
                },
                UserAction::SetLoginField {
                    field: LoginField::Password,
                    value: password,
                },
                UserAction::SubmitLogin,
            ])
        }
        "signup" => {
            let values = expect_args::<6>(name, &args)?;
            let fields = [
                SignupField::Name,
                SignupField::Email,
                SignupField::Phone,
                SignupField::Password,
                SignupField::State,
                SignupField::Language,
            ];
            let mut actions: Vec<_> = fields
                .into_iter()
                .zip(values)
                .map(|(field, value)| UserAction::SetSignupField { field, value })
                .collect();
            actions.push(UserAction::SubmitSignup);
            Command::Actions(actions)
        }
        "logout" => action(UserAction::Logout),
        "chat" => action(UserAction::SendChatMessage {
            text: rest.to_string(),
        }),
        "quick" => {
            let [n] = expect_args::<1>(name, &args)?;
            let quick = position(&n, QUICK_ACTIONS.len())
                .map(|index| QUICK_ACTIONS[index])
                .ok_or_else(|| anyhow!("quick action must be 1-{}", QUICK_ACTIONS.len()))?;
            action(UserAction::SelectQuickAction {
                prompt: quick.prompt.to_string(),
            })
        }
        "upload" => {
            let [path] = expect_args::<1>(name, &args)?;
            Command::Upload(PathBuf::from(path))
        }
        "remove" => action(UserAction::RemoveImage),
        "filter" => {
            let [field, value] = expect_args::<2>(name, &args)?;
            let field: CropFilter = field.parse()?;
            action(UserAction::SetFilter { field, value })
        }
        "recommend" => action(UserAction::RequestRecommendations),
        "plan" => action(UserAction::AddToCropPlan {
            crop: rest.to_string(),
        }),
        "post" => Command::Actions(vec![
            UserAction::SetPostDraft {
                text: rest.to_string(),
            },
            UserAction::PublishPost,
        ]),
        "like" => {
            let [n] = expect_args::<1>(name, &args)?;
            let index = n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .with_context(|| format!("'{n}' is not a post number"))?;
            action(UserAction::LikePost { index })
        }
        "feature" => action(UserAction::OpenFeature {
            title: args.join(" "),
        }),
        "pref" => {
            let [toggle, state] = expect_args::<2>(name, &args)?;
            let toggle: PreferenceToggle = toggle.parse()?;
            let enabled = match state.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => bail!("expected on or off, got '{other}'"),
            };
            action(UserAction::SetPreference { toggle, enabled })
        }
        "nav" => Command::Nav,
        "state" => Command::State,
        "wait" => Command::Wait,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn action(action: UserAction) -> Command {
    Command::Actions(vec![action])
}

fn expect_args<const N: usize>(name: &str, args: &[String]) -> anyhow::Result<[String; N]> {
    <[String; N]>::try_from(args.to_vec())
        .map_err(|got| anyhow!("'{name}' takes {N} argument(s), got {}", got.len()))
}

/// 1-based position into a list of `len` items.
fn position(raw: &str, len: usize) -> Option<usize> {
    let n = raw.parse::<usize>().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Whitespace-separated words; double quotes group words containing spaces.
fn split_args(raw: &str) -> anyhow::Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in raw.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            ch => {
                current.push(ch);
                pending = true;
            }
        }
    }
    if in_quotes {
        bail!("unterminated quote");
    }
    if pending {
        args.push(current);
    }
    Ok(args)
}

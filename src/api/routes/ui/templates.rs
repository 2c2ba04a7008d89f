//! HTML for the chat page, rendered with Handlebars. Handlebars escapes
//! every `{{value}}` so user and model text can't inject markup.

use std::fmt;

use handlebars::Handlebars;
use serde::Serialize;

use crate::ai::chat::{Phase, Role, Session};
use crate::ai::prompt::{ASSISTANT_NAME, PAGE_TITLE};

#[derive(Debug)]
pub enum Template {
    ChatPage,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub const INPUT_PLACEHOLDER: &str = "Ask about health, vaccination, or outbreaks...";

const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{{#if pending}}<meta http-equiv="refresh" content="2">{{/if}}
<title>{{{title}}}</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🩺</text></svg>">
<style>
body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; }
aside { width: 16rem; padding: 1rem; background: #f0f2f6; }
main { flex: 1; max-width: 46rem; margin: 0 auto; padding: 1rem; display: flex; flex-direction: column; }
h1 { text-align: center; }
.turn { display: flex; gap: .75rem; margin: .5rem 0; padding: .75rem; border-radius: .5rem; }
.turn.assistant { background: #f7f7f9; }
.turn.error { background: #fdecea; color: #8a1c1c; }
.text { white-space: pre-wrap; }
#composer { display: flex; gap: .5rem; margin-top: auto; padding-top: 1rem; }
#composer input { flex: 1; padding: .5rem; }
#pending { display: none; color: #666; }
#pending.active { display: block; }
</style>
</head>
<body>
<aside>
  <h2>⚙️ Settings</h2>
  <form method="post" action="/settings/name">
    <label for="name">Your Name</label>
    <input id="name" name="name" value="{{display_name}}">
    <button type="submit">Save</button>
  </form>
  <form method="post" action="/reset">
    <button type="submit">🗑️ Clear Chat History</button>
  </form>
</aside>
<main>
  <h1>{{{title}}}</h1>
  <hr>
  {{#each turns}}
  <div class="turn {{role}}{{#if is_error}} error{{/if}}">
    <span class="avatar">{{avatar}}</span>
    <div><strong>{{speaker}}:</strong> <span class="text">{{text}}</span></div>
  </div>
  {{/each}}
  <p id="pending"{{#if pending}} class="active"{{/if}}>{{assistant_name}} is thinking...</p>
  <form id="composer" method="post" action="/chat">
    <input name="message" placeholder="{{placeholder}}" autocomplete="off" autofocus required>
    <button type="submit">Send</button>
  </form>
</main>
<script>
document.getElementById("composer").addEventListener("submit", function (e) {
  e.target.querySelector("button").disabled = true;
  document.getElementById("pending").style.display = "block";
});
</script>
</body>
</html>
"#;

#[derive(Serialize)]
struct TurnView<'a> {
    role: &'static str,
    avatar: &'static str,
    speaker: &'a str,
    text: &'a str,
    is_error: bool,
}

#[derive(Serialize)]
struct ChatPageView<'a> {
    title: &'static str,
    placeholder: &'static str,
    assistant_name: &'static str,
    display_name: &'a str,
    // A reply is on its way; the page refreshes until it lands
    pending: bool,
    turns: Vec<TurnView<'a>>,
}

/// Project the session onto the chat page.
pub fn render_chat_page(
    registry: &Handlebars<'static>,
    session: &Session,
) -> Result<String, handlebars::RenderError> {
    let turns = session
        .transcript()
        .iter()
        .map(|turn| match turn.role() {
            Role::User => TurnView {
                role: "user",
                avatar: "👤",
                speaker: session.display_name(),
                text: turn.text(),
                is_error: false,
            },
            Role::Assistant => TurnView {
                role: "assistant",
                avatar: "🩺",
                speaker: ASSISTANT_NAME,
                text: turn.text(),
                is_error: turn.is_error(),
            },
        })
        .collect();

    let view = ChatPageView {
        title: PAGE_TITLE,
        placeholder: INPUT_PLACEHOLDER,
        assistant_name: ASSISTANT_NAME,
        display_name: session.display_name(),
        pending: session.phase() == Phase::AwaitingReply,
        turns,
    };

    registry.render(&Template::ChatPage.to_string(), &view)
}

pub fn templates() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Template::ChatPage.to_string(), CHAT_PAGE)
        .expect("Failed to register template");
    registry
}

// Widget page shell.
//
// The page only forwards events to `/chat` and swaps in the transcript the
// server renders. Element ids and classes are the widget's DOM contract.

use axum::{extract::State, response::Html};

use crate::config::WidgetConfig;
use crate::error::FALLBACK_REPLY;
use crate::services::transcript::escape_attr;
use crate::state::SharedState;

pub async fn page_handler(State(state): State<SharedState>) -> Html<String> {
    Html(build_widget_page(&state.config))
}

/// Build the complete HTML page for the chat widget.
pub fn build_widget_page(config: &WidgetConfig) -> String {
    let title = escape_attr(&config.bot_name);
    let prompts: String = config
        .quick_prompts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let p = escape_attr(p);
            format!(r#"<button class="prompt-button" data-index="{i}" data-prompt="{p}">{p}</button>"#)
        })
        .collect();
    // JS string literals for the client-side nodes.
    let avatar = serde_json::json!(format!(
        r#"<div class="message-avatar"><img src="{}" alt="{}"></div>"#,
        escape_attr(&config.avatar_url),
        title,
    ))
    .to_string();
    let fallback = serde_json::json!(FALLBACK_REPLY).to_string();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="style.css">
</head>
<body>
<section class="chat">
  <div class="chat-messages" id="chatMessages"></div>
  <div class="quick-prompts">{prompts}</div>
  <div class="chat-input-bar">
    <input type="text" id="chatInput" placeholder="Type your message..." autocomplete="off">
    <button id="sendButton">Send</button>
  </div>
</section>
<script>
const TAB_KEY="chat_tab_id";
const msgs=document.getElementById("chatMessages");
const input=document.getElementById("chatInput");
const sendBtn=document.getElementById("sendButton");
const AVATAR={avatar};
const FALLBACK={fallback};
const TYPING='<div class="message bot-message">'+AVATAR+'<div class="message-content"><div class="typing-indicator"><span class="typing-dot"></span><span class="typing-dot"></span><span class="typing-dot"></span></div></div></div>';

function esc(t){{return t.replace(/</g,"&lt;").replace(/>/g,"&gt;")}}
function userNode(t){{return '<div class="message user-message"><div class="message-content"><p>'+esc(t)+'</p></div></div>'}}
function botNode(t){{return '<div class="message bot-message">'+AVATAR+'<div class="message-content"><p>'+t+'</p></div></div>'}}
function append(html){{msgs.insertAdjacentHTML("beforeend",html);msgs.scrollTop=msgs.scrollHeight;return msgs.lastElementChild}}
function setEnabled(on){{input.disabled=!on;sendBtn.disabled=!on;if(on)input.focus()}}
function render(html){{msgs.innerHTML=html;msgs.scrollTop=msgs.scrollHeight}}

async function send(text,prompt){{
  setEnabled(false);
  append(userNode(text));
  const typing=append(TYPING);
  try{{
    const res=await fetch("/chat",{{
      method:"POST",
      headers:{{"Content-Type":"application/json"}},
      body:JSON.stringify({{session_id:sessionStorage.getItem(TAB_KEY),message:text,prompt:prompt}})
    }});
    if(!res.ok)throw new Error("chat request failed: "+res.status);
    const data=await res.json();
    sessionStorage.setItem(TAB_KEY,data.session_id);
    render(data.transcript_html);
  }}catch(e){{
    console.error("Error:",e);
    typing.remove();
    append(botNode(FALLBACK));
  }}
  finally{{setEnabled(true)}}
}}

function handleSend(){{
  const text=input.value.trim();
  if(!text)return;
  input.value="";
  send(text);
}}

document.addEventListener("DOMContentLoaded",async()=>{{
  sendBtn.addEventListener("click",handleSend);
  input.addEventListener("keypress",e=>{{if(e.key==="Enter")handleSend()}});
  document.querySelectorAll(".prompt-button").forEach(b=>
    b.addEventListener("click",()=>send(b.getAttribute("data-prompt"),Number(b.dataset.index))));
  const tab=sessionStorage.getItem(TAB_KEY);
  if(tab){{
    const res=await fetch(`/session/${{encodeURIComponent(tab)}}/transcript`);
    if(res.ok)render(await res.text());else sessionStorage.removeItem(TAB_KEY);
  }}
}});
</script>
</body>
</html>"##
    )
}

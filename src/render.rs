//! HTML presentation of the merged message sequence.
//!
//! Messages are grouped into contiguous same-sender runs, rendered through
//! a maud template (bodies escaped), and the rendered document is then
//! rewritten by a fixed series of regex passes that turn media annotations
//! into embedded tags and bare URLs into links. The media passes must run
//! before URL-linking so a URL inside a media filename is never wrapped
//! twice.

use chrono::NaiveDateTime;
use maud::{DOCTYPE, PreEscaped, html};
use regex::{Captures, Regex};

use crate::config::ArchiveConfig;
use crate::message::Message;
use crate::toc::TocData;

/// Left-to-right mark; WhatsApp puts one before attachment names.
const LRM: char = '\u{200e}';

const URL_PATTERN: &str = r#"(?P<pre>href="|src="|">)?(?P<url>https?://[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b[-a-zA-Z0-9()@:%_+.~#?&/=;]*)"#;

const STYLE: &str = "
body {
    font-family: sans-serif;
    font-size: 10px;
}
ol.users {
    list-style-type: none;
    list-style-position: inside;
    margin: 0;
    padding: 0;
}
ol.messages {
    list-style-type: none;
    list-style-position: inside;
    margin: 0;
    padding: 0;
}
ol.messages li {
    margin-left: 1em;
    font-size: 12px;
}
span.username {
    color: gray;
}
span.date {
    color: gray;
}
";

/// A contiguous run of messages by one sender.
///
/// Grouping is by the *current* sender, not globally: a sender speaking
/// again after someone else starts a new run.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderRun {
    pub sender: String,
    pub messages: Vec<Message>,
}

/// Groups messages into contiguous same-sender runs.
pub fn group_runs(messages: Vec<Message>) -> Vec<SenderRun> {
    let mut runs: Vec<SenderRun> = Vec::new();
    for msg in messages {
        match runs.last_mut() {
            Some(run) if run.sender == msg.sender => run.messages.push(msg),
            _ => runs.push(SenderRun {
                sender: msg.sender.clone(),
                messages: vec![msg],
            }),
        }
    }
    runs
}

/// Renders the archive page.
///
/// Message bodies are escaped here; media annotations and URLs inside them
/// are turned into markup afterwards by [`PostProcessor`].
pub fn render_page(
    runs: &[SenderRun],
    toc: &TocData,
    input_basename: &str,
    generated: NaiveDateTime,
) -> String {
    let stand = generated.format("%d.%m.%Y, %H:%M Uhr").to_string();
    html! {
        (DOCTYPE)
        html {
            head {
                title { "WhatsApp archive " (input_basename) }
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                style { (PreEscaped(STYLE)) }
            }
            body {
                a name="top" {}
                h1 { (input_basename) ", Stand vom " (stand) }
                @if !toc.title.is_empty() {
                    h2 { (toc.title) }
                }
                @if !toc.toc.is_empty() {
                    ol class="messages" {
                        @for item in &toc.toc {
                            li { a href={ "#" (item.anchor) } { (item.text) } }
                        }
                    }
                }
                @if !toc.link_list.is_empty() {
                    ol class="messages" {
                        @for item in &toc.link_list {
                            li {
                                a href=(item.target) target="_blank" rel="noopener" { (item.text) }
                            }
                        }
                    }
                }
                h2 { "Chat-Archiv" }
                ol class="users" {
                    @for run in runs {
                        @let first = run
                            .messages
                            .first()
                            .map(|m| m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_default();
                        li {
                            a name={ (run.sender) " " (first) } {}
                            span class="username" { (run.sender) }
                            " "
                            span class="date" { (first) }
                            ol class="messages" {
                                @for msg in &run.messages {
                                    li { (msg.body) }
                                }
                            }
                            a href="#top" { "Zurück nach oben" }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

/// Compiled post-processing passes over the rendered document.
///
/// Pass order is fixed: mp4 → video, opus/ogg → audio, vcf → link, any
/// remaining annotation → img, then URL autolinking. The URL pass is
/// idempotent — URLs already sitting in an `href="…"` or rendered as
/// anchor text keep their prefix and are left untouched.
pub struct PostProcessor {
    video_re: Regex,
    audio_re: Regex,
    contact_re: Regex,
    image_re: Regex,
    url_re: Regex,
}

impl PostProcessor {
    pub fn new(config: &ArchiveConfig) -> Self {
        let note = regex::escape(&config.attachment_note);
        let annotation = |stem: &str| {
            // The filename sits at the start of its <li> text node; [^<\n]
            // keeps the match inside one node and off continuation lines.
            Regex::new(&format!(r"<li>{LRM}?([^<\n]*{stem}) \({note}\)")).unwrap()
        };
        Self {
            video_re: annotation(r"\.mp4"),
            audio_re: annotation(r"\.(?:opus|ogg)"),
            contact_re: annotation(r"\.vcf"),
            image_re: annotation(""),
            url_re: Regex::new(URL_PATTERN).unwrap(),
        }
    }

    /// Rewrites media annotations and bare URLs in a rendered document.
    pub fn process(&self, html: &str) -> String {
        let html = self.video_re.replace_all(
            html,
            r#"<li><video autoplay muted controls><source src="${1}" type="video/mp4">Video kann nicht angezeigt werden.</video>"#,
        );
        let html = self.audio_re.replace_all(
            &html,
            r#"<li><audio controls><source src="${1}">Audio kann nicht wiedergegeben werden.</audio>"#,
        );
        let html = self
            .contact_re
            .replace_all(&html, r#"<li><a href="${1}">${1}</a>"#);
        let html = self.image_re.replace_all(&html, r#"<li><img src="${1}">"#);
        let html = self.url_re.replace_all(&html, |caps: &Captures| {
            if caps.name("pre").is_some() {
                caps[0].to_string()
            } else {
                let url = &caps["url"];
                format!(r#"<a href="{url}" target="_blank" rel="noopener">{url}</a>"#)
            }
        });
        html.into_owned()
    }
}

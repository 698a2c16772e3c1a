//! Transcript rendering over an ordered message stream.
//!
//! Messages arrive sorted by conversation, then timestamp. The builder groups
//! them by run length: a new document starts whenever the conversation name
//! differs from the previous message's, and a day heading is written whenever
//! the calendar date changes within a document.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::timestamp::{apple_epoch, from_apple_timestamp};
use crate::domain::{AppError, ChatMessage, ExportStats, MediaKind, Result};
use crate::infrastructure::{ContentStore, DocumentConverter, MediaCache};

/// Placeholder for messages with neither text nor media.
pub const SYSTEM_NOTICE: &str = "`voice call/E2E encryption notice/deleted message`";

/// Media subdirectory, relative to the transcripts.
const MEDIA_DIR_NAME: &str = "media";

/// Makes a conversation name usable as a filename.
///
/// Double quotes are dropped; `/` and `:` become `-`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '"')
        .map(|c| if c == '/' || c == ':' { '-' } else { c })
        .collect()
}

/// Wraps bare `http://` and `https://` URLs in angle brackets.
///
/// A URL runs until the next whitespace character.
#[must_use]
pub fn autolink(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut rest = text;

    while let Some(start) = find_url_start(rest) {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);

        let scheme_len = if tail.starts_with("https://") { 8 } else { 7 };
        let end = tail.find(char::is_whitespace).unwrap_or(tail.len());

        if end > scheme_len {
            out.push('<');
            out.push_str(&tail[..end]);
            out.push('>');
        } else {
            out.push_str(&tail[..end]);
        }
        rest = &tail[end..];
    }

    out.push_str(rest);
    out
}

fn find_url_start(s: &str) -> Option<usize> {
    s.match_indices("http")
        .map(|(i, _)| i)
        .find(|&i| s[i..].starts_with("http://") || s[i..].starts_with("https://"))
}

/// Renders message text as the body of a markdown list item.
///
/// Blank-line runs collapse to a single line break and continuation lines are
/// indented so they stay inside the list item.
#[must_use]
pub fn render_text(text: &str) -> String {
    let linked = autolink(text);

    let mut collapsed = String::with_capacity(linked.len());
    let mut previous_newline = false;
    for c in linked.chars() {
        if c == '\n' {
            if previous_newline {
                continue;
            }
            previous_newline = true;
        } else {
            previous_newline = false;
        }
        collapsed.push(c);
    }

    collapsed.replace('\n', "\n  ")
}

/// Markdown/HTML fragment embedding an attachment.
#[must_use]
pub fn media_fragment(kind: MediaKind, rel_path: &str) -> String {
    match kind {
        MediaKind::Image => format!("![could not load image]({rel_path})"),
        MediaKind::Audio => format!("<audio controls><source src={rel_path} /></audio>"),
        MediaKind::Video => format!("<video controls><source src={rel_path} /></video>"),
        MediaKind::Document => format!("[document]({rel_path})"),
    }
}

/// Inline marker for an attachment that could not be resolved.
#[must_use]
pub fn missing_media_marker(media_path: &str) -> String {
    format!("`could not load media {media_path}`")
}

/// The document currently being written.
struct OpenConversation {
    name: String,
    file_stem: String,
    writer: BufWriter<File>,
    current_day: Option<NaiveDate>,
}

/// Writes one markdown document per conversation and copies attachments.
pub struct TranscriptBuilder<'a> {
    media: &'a MediaCache,
    store: &'a ContentStore,
    converter: Option<&'a dyn DocumentConverter>,
    out_dir: PathBuf,
    media_dir: PathBuf,
    open: Option<OpenConversation>,
    used_stems: HashSet<String>,
    next_media_number: u64,
    stats: ExportStats,
}

impl<'a> TranscriptBuilder<'a> {
    /// Creates a builder writing into `out_dir`; attachments go to `out_dir/media`.
    ///
    /// Both directories must already exist.
    #[must_use]
    pub fn new(
        media: &'a MediaCache,
        store: &'a ContentStore,
        converter: Option<&'a dyn DocumentConverter>,
        out_dir: &Path,
    ) -> Self {
        Self {
            media,
            store,
            converter,
            out_dir: out_dir.to_path_buf(),
            media_dir: out_dir.join(MEDIA_DIR_NAME),
            open: None,
            used_stems: HashSet::new(),
            next_media_number: 0,
            stats: ExportStats::default(),
        }
    }

    /// Appends the next message of the stream.
    ///
    /// # Errors
    /// Returns error if an output file cannot be created or written.
    pub fn push(&mut self, message: &ChatMessage) -> Result<()> {
        let mut conv = match self.open.take() {
            Some(conv) if conv.name == message.conversation => conv,
            previous => {
                if let Some(prev) = previous {
                    self.finish_conversation(prev)?;
                }
                self.open_conversation(&message.conversation)?
            }
        };

        let when = from_apple_timestamp(message.timestamp_raw).unwrap_or_else(|| {
            tracing::warn!(
                raw = message.timestamp_raw,
                conversation = %message.conversation,
                "Unrepresentable message date, using epoch"
            );
            apple_epoch()
        });

        let content = self.render_content(message)?;

        let day = when.date();
        if conv.current_day != Some(day) {
            write!(conv.writer, "\n# {}\n\n", day.format("%d %B %Y")).map_err(write_error)?;
            conv.current_day = Some(day);
        }

        writeln!(
            conv.writer,
            "- `{}` **{}**: {}",
            when.format("%I:%M %p"),
            message.sender_label(),
            content
        )
        .map_err(write_error)?;

        self.open = Some(conv);
        self.stats.message_count += 1;
        Ok(())
    }

    /// Closes the last document and returns the run totals.
    ///
    /// # Errors
    /// Returns error if the last document cannot be flushed.
    pub fn finish(mut self) -> Result<ExportStats> {
        if let Some(conv) = self.open.take() {
            self.finish_conversation(conv)?;
        }
        Ok(self.stats)
    }

    fn open_conversation(&mut self, name: &str) -> Result<OpenConversation> {
        let file_stem = self.unique_stem(name);
        let path = self.out_dir.join(format!("{file_stem}.md"));

        let file = File::create(&path)
            .map_err(|e| AppError::io(format!("Failed to create {}", path.display()), e))?;

        tracing::debug!(conversation = %name, path = %path.display(), "Opened transcript");

        self.stats.conversation_count += 1;
        Ok(OpenConversation {
            name: name.to_string(),
            file_stem,
            writer: BufWriter::new(file),
            current_day: None,
        })
    }

    /// Sanitized name, suffixed when two conversations sanitize to the same file.
    fn unique_stem(&mut self, name: &str) -> String {
        let base = sanitize_filename(name);
        let mut stem = base.clone();
        let mut n = 2;
        while self.used_stems.contains(&stem) {
            stem = format!("{base} ({n})");
            n += 1;
        }
        self.used_stems.insert(stem.clone());
        stem
    }

    /// Flushes a finished transcript and hands it to the converter.
    fn finish_conversation(&mut self, mut conv: OpenConversation) -> Result<()> {
        conv.writer.flush().map_err(write_error)?;
        drop(conv.writer);

        let Some(converter) = self.converter else {
            return Ok(());
        };

        let markdown = self.out_dir.join(format!("{}.md", conv.file_stem));
        let html = self.out_dir.join(format!("{}.html", conv.file_stem));

        if let Err(e) = converter.convert(&markdown, &html, &conv.name) {
            tracing::warn!(conversation = %conv.name, "{}", e);
            self.stats.converter_failures += 1;
        }

        Ok(())
    }

    fn render_content(&mut self, message: &ChatMessage) -> Result<String> {
        if let Some(media_path) = message.media() {
            return self.render_media(media_path);
        }

        Ok(message
            .body()
            .map_or_else(|| SYSTEM_NOTICE.to_string(), render_text))
    }

    fn render_media(&mut self, media_path: &str) -> Result<String> {
        let media = self.media;
        let Some(file_id) = media.lookup(media_path) else {
            tracing::warn!(media = %media_path, "No file found for media");
            self.stats.media_missing += 1;
            return Ok(missing_media_marker(media_path));
        };

        let ext = Path::new(media_path)
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let number = self.next_media_number;
        let file_name = ext
            .as_deref()
            .map_or_else(|| number.to_string(), |e| format!("{number}.{e}"));

        match self.store.copy_to(file_id, &self.media_dir.join(&file_name)) {
            Ok(_) => {}
            Err(AppError::MissingBlob { path, .. }) => {
                tracing::warn!(media = %media_path, blob = %path.display(), "Media blob missing");
                self.stats.media_missing += 1;
                return Ok(missing_media_marker(media_path));
            }
            Err(e) => return Err(e),
        }

        self.next_media_number += 1;
        self.stats.media_copied += 1;

        let kind = MediaKind::from_extension(ext.as_deref().unwrap_or_default());
        Ok(media_fragment(kind, &format!("{MEDIA_DIR_NAME}/{file_name}")))
    }
}

fn write_error(err: std::io::Error) -> AppError {
    AppError::io("Failed to write transcript", err)
}

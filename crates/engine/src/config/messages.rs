/// A user-facing string the engine needs rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
	/// Hover text attached to a problem marker.
	Hover {
		/// The flagged word.
		word: &'a str,
	},
	/// Label of the ignore action.
	IgnoreLabel {
		/// The flagged word.
		word: &'a str,
	},
	/// Label of the add-to-dictionary action.
	AddWordLabel {
		/// The flagged word.
		word: &'a str,
	},
	/// Label of a replace action.
	ApplySuggestion {
		/// The flagged word.
		word: &'a str,
		/// The replacement offered.
		suggestion: &'a str,
	},
}

/// Produces the strings shown in markers and quick-fix menus.
///
/// Closures of type `Fn(Message<'_>) -> String` implement this trait, so a
/// host can localize every message with a single match.
pub trait MessageBuilder: Send + Sync {
	/// Renders one message.
	fn build(&self, message: Message<'_>) -> String;
}

impl<F> MessageBuilder for F
where
	F: Fn(Message<'_>) -> String + Send + Sync,
{
	fn build(&self, message: Message<'_>) -> String {
		self(message)
	}
}

/// English messages used when the host does not supply a builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageBuilder for DefaultMessages {
	fn build(&self, message: Message<'_>) -> String {
		match message {
			Message::Hover { word } => format!("\"{word}\" is misspelled"),
			Message::IgnoreLabel { word } => format!("Ignore \"{word}\""),
			Message::AddWordLabel { word } => format!("Add \"{word}\" to dictionary"),
			Message::ApplySuggestion { suggestion, .. } => format!("Replace with \"{suggestion}\""),
		}
	}
}

/// Execution classes used for task scheduling and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Work the user is directly waiting on: forced scans, fix application.
	Interactive,
	/// Debounced scans that may be superseded before they publish.
	Background,
	/// Single-slot timers that only sleep and then trigger other work.
	Timer,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::Timer => "timer",
		}
	}
}

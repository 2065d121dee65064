//! Invariant catalog for [`crate::Spellchecker`].
#![allow(dead_code)]

/// Must never publish annotations from a scan that a newer scan superseded.
///
/// - Enforced in: [`crate::store::AnnotationStore::publish`], with early exits in [`crate::scan::Scanner::run`]
/// - Tested by: `lifecycle::tests::test_stale_scan_is_suppressed`, `store::tests::test_publish_rejects_superseded_generation`
/// - Failure symptom: Markers flicker back to words that were already fixed, or land on the wrong columns after an edit.
pub(crate) const STALE_SCANS_NEVER_PUBLISH: () = ();

/// Must keep annotations in (line, column) order regardless of tokenizer output order or classifier completion order.
///
/// - Enforced in: [`crate::scan::Scanner::run`]
/// - Tested by: `scan::tests::test_order_independent_of_completion_order`, `scan::tests::test_reversed_tokenizer_output_is_published_in_document_order`
/// - Failure symptom: Quick fixes resolve to a later word than the one under the cursor.
pub(crate) const ANNOTATIONS_IN_DOCUMENT_ORDER: () = ();

/// Must hold at most one pending debounce timer, and only the last notification of a burst may scan.
///
/// - Enforced in: [`crate::debounce::Debouncer::notify`]
/// - Tested by: `lifecycle::tests::test_edit_burst_triggers_one_scan`, `debounce::tests::test_only_last_notification_survives`
/// - Failure symptom: Every keystroke starts a full-document scan.
pub(crate) const ONE_TIMER_PER_BURST: () = ();

/// Must scan once on attach without waiting for the debounce interval.
///
/// - Enforced in: [`crate::Spellchecker::new`]
/// - Tested by: `lifecycle::tests::test_initial_scan_skips_debounce`
/// - Failure symptom: Newly opened documents show no markers until the first edit.
pub(crate) const ATTACH_SCANS_IMMEDIATELY: () = ();

/// Must release every host registration, clear markers and cancel the pending timer on dispose.
///
/// - Enforced in: [`crate::Spellchecker::dispose`]
/// - Tested by: `lifecycle::tests::test_dispose_tears_down_everything`, `lifecycle::tests::test_drop_disposes`
/// - Failure symptom: Markers or quick fixes from a detached spellchecker linger in the editor.
pub(crate) const DISPOSE_RELEASES_EVERYTHING: () = ();

/// Must apply a replacement as exactly one host edit, and only while the span still holds the word.
///
/// - Enforced in: [`crate::fix::FixHandler::apply_replace`]
/// - Tested by: `fix::tests::test_replace_is_one_undoable_edit`, `fix::tests::test_replace_rejects_stale_annotation`
/// - Failure symptom: Undo reverts half a fix, or a fix overwrites text typed after the scan.
pub(crate) const REPLACE_IS_ONE_EDIT: () = ();

/// Must never run two ignore or add-word callbacks at once.
///
/// - Enforced in: [`crate::fix::FixHandler`] (the callback gate)
/// - Tested by: `fix::tests::test_word_callbacks_never_overlap`
/// - Failure symptom: Host dictionaries receive interleaved writes.
pub(crate) const WORD_CALLBACKS_SERIALIZED: () = ();

/// Must re-scan right after a successful ignore or add-word, and must not re-scan after a failed one.
///
/// - Enforced in: [`crate::Spellchecker::apply`]
/// - Tested by: `lifecycle::tests::test_ignore_rescans_before_returning`, `lifecycle::tests::test_failed_ignore_skips_rescan`
/// - Failure symptom: Ignored words stay flagged until the next edit.
pub(crate) const DICTIONARY_CHANGE_RESCANS: () = ();

/// Must return no actions for a cancelled quick-fix query.
///
/// - Enforced in: [`crate::fix::FixHandler::query_actions`]
/// - Tested by: `fix::tests::test_cancelled_query_yields_none`
/// - Failure symptom: A menu for an old cursor position pops up after the user moved on.
pub(crate) const CANCELLED_QUERIES_YIELD_NOTHING: () = ();

/// Must render published sets to the host in publish order without holding the writer lock.
///
/// - Enforced in: [`crate::store::AnnotationStore::publish`]
/// - Tested by: `store::tests::test_sink_may_call_back_into_store`, `store::tests::test_publish_swaps_whole_set_and_renders`
/// - Failure symptom: The editor hangs when a marker renderer touches the spellchecker, or shows an older set after a newer one.
pub(crate) const RENDERS_IN_PUBLISH_ORDER: () = ();

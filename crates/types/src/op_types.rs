//! Operation-type constants referenced by call sites.
//!
//! Classification tables are validated against this list at startup so a
//! newly added constant cannot silently drift into the wrong routing path.

/// Free-text comment edit on an item
pub const UPDATE_COMMENT: &str = "update-comment";

/// Change the anatomical side annotation
pub const SET_LATERALITY: &str = "set-laterality";

/// Flip the per-item edit lock indicator
pub const TOGGLE_LOCK: &str = "toggle-lock";

/// Requested -> Processing
pub const START_TASK: &str = "start-task";

/// Decrement the remaining-repetitions counter
pub const DECREMENT_COUNTER: &str = "decrement-counter";

/// Force the item to Done
pub const MARK_DONE: &str = "mark-done";

/// Reopen a Done item for one more repetition
pub const UNLOCK_TASK: &str = "unlock-task";

/// Requested/Processing -> Cancelled
pub const CANCEL_TASK: &str = "cancel-task";

/// Change the billing code attached to the item
pub const UPDATE_BILLING_CODE: &str = "update-billing-code";

/// Generate an invoice row from the item
pub const CREATE_INVOICE: &str = "create-invoice";

/// Route the item to a different diagnostic modality
pub const ASSIGN_MODALITY: &str = "assign-modality";

/// Move the item to a different time slot
pub const RESCHEDULE: &str = "reschedule";

/// Every operation-type constant a call site may submit
pub const ALL: &[&str] = &[
    UPDATE_COMMENT,
    SET_LATERALITY,
    TOGGLE_LOCK,
    START_TASK,
    DECREMENT_COUNTER,
    MARK_DONE,
    UNLOCK_TASK,
    CANCEL_TASK,
    UPDATE_BILLING_CODE,
    CREATE_INVOICE,
    ASSIGN_MODALITY,
    RESCHEDULE,
];

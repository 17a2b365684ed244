// doc constants
pub const DOC_ID: &str = "_id";

// criteria operator constants
pub const OP_IN: &str = "$in";

// update operator constants
pub const OP_INC: &str = "$inc";
pub const OP_SET: &str = "$set";
pub const OP_UNSET: &str = "$unset";
pub const OP_PUSH: &str = "$push";
pub const OP_PUSH_ALL: &str = "$pushAll";
pub const OP_ADD_TO_SET: &str = "$addToSet";
pub const OP_PULL: &str = "$pull";
pub const OP_PULL_ALL: &str = "$pullAll";
pub const OP_POP: &str = "$pop";

/// Marker value assigned to each field named in an `$unset` payload.
pub const UNSET_MARKER: i32 = 1;

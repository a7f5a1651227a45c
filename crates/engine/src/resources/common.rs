//! Attributes shared by most RouterOS menus.

use crate::schema::Attribute;

/// Required `name`, usually the natural key.
pub fn name() -> Attribute {
    Attribute::string("name").required()
}

pub fn comment() -> Attribute {
    Attribute::string("comment")
}

/// `disabled`, which the device reports as `false` when never set.
pub fn disabled() -> Attribute {
    Attribute::bool("disabled").default(false)
}

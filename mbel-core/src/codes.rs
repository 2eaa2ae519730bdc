//! The closed set of diagnostic codes.
//!
//! Codes within the `MBEL-*` namespaces are assigned fixed numbers here;
//! the numbering is part of the public contract and must not be reused for
//! a different meaning.

// Lexical
pub const UNKNOWN_CHARACTER: &str = "UNKNOWN_CHARACTER";
pub const INVALID_NUMBER: &str = "INVALID_NUMBER";
pub const UNCLOSED_SECTION: &str = "UNCLOSED_SECTION";
pub const UNCLOSED_LIST: &str = "UNCLOSED_LIST";
pub const UNCLOSED_METADATA: &str = "UNCLOSED_METADATA";
pub const UNCLOSED_NOTE: &str = "UNCLOSED_NOTE";
pub const UNCLOSED_VARIANT: &str = "UNCLOSED_VARIANT";
pub const UNCLOSED_CODE_FENCE: &str = "UNCLOSED_CODE_FENCE";

// Syntactic
pub const UNEXPECTED_TOKEN: &str = "UNEXPECTED_TOKEN";
pub const EXPECTED_IDENTIFIER: &str = "EXPECTED_IDENTIFIER";
pub const EXPECTED_EXPRESSION: &str = "EXPECTED_EXPRESSION";
pub const EXPECTED_LIST: &str = "EXPECTED_LIST";
pub const EXPECTED_VERSION: &str = "EXPECTED_VERSION";

// Grammar style
pub const ARTICLE_USAGE: &str = "ARTICLE_USAGE";
pub const NON_CAMEL_CASE: &str = "NON_CAMEL_CASE";
pub const LOWERCASE_SECTION: &str = "LOWERCASE_SECTION";
pub const PREFER_OPERATOR: &str = "PREFER_OPERATOR";

// Document structure
pub const UNUSED_SECTION: &str = "UNUSED_SECTION";
pub const DUPLICATE_SECTION: &str = "DUPLICATE_SECTION";
pub const DUPLICATE_ATTRIBUTE: &str = "DUPLICATE_ATTRIBUTE";
pub const MISSING_VERSION: &str = "MISSING_VERSION";

// Link validation (MBEL-LINK-001..070)
pub const LINK_MISSING_NAME: &str = "MBEL-LINK-001";
pub const LINK_INVALID_NAME: &str = "MBEL-LINK-010";
pub const LINK_DUPLICATE_NAME: &str = "MBEL-LINK-020";
pub const LINK_INVALID_GLOB: &str = "MBEL-LINK-030";
pub const LINK_INVALID_LINE_RANGE: &str = "MBEL-LINK-040";
pub const LINK_LINE_RANGE_ORDER: &str = "MBEL-LINK-041";
pub const LINK_UNDEFINED_REFERENCE: &str = "MBEL-LINK-050";
pub const LINK_SELF_REFERENCE: &str = "MBEL-LINK-051";
pub const LINK_CIRCULAR_DEPENDENCY: &str = "MBEL-LINK-060";
pub const LINK_ORPHAN: &str = "MBEL-LINK-070";

// Anchor validation (MBEL-ANCHOR-001..011)
pub const ANCHOR_EMPTY_PATH: &str = "MBEL-ANCHOR-001";
pub const ANCHOR_PATH_SPACES: &str = "MBEL-ANCHOR-002";
pub const ANCHOR_DUPLICATE: &str = "MBEL-ANCHOR-003";
pub const ANCHOR_EMPTY_DESCRIPTION: &str = "MBEL-ANCHOR-010";
pub const ANCHOR_INVALID_GLOB: &str = "MBEL-ANCHOR-011";

// Decision validation (MBEL-DECISION-001..040)
pub const DECISION_EMPTY_NAME: &str = "MBEL-DECISION-001";
pub const DECISION_DUPLICATE: &str = "MBEL-DECISION-002";
pub const DECISION_INVALID_DATE: &str = "MBEL-DECISION-003";
pub const DECISION_INVALID_STATUS: &str = "MBEL-DECISION-010";
pub const DECISION_SUPERSEDED_WITHOUT_TARGET: &str = "MBEL-DECISION-020";
pub const DECISION_DANGLING_SUPERSEDED_BY: &str = "MBEL-DECISION-021";
pub const DECISION_MISSING_REASON: &str = "MBEL-DECISION-030";
pub const DECISION_EMPTY_REASON: &str = "MBEL-DECISION-031";
pub const DECISION_EMPTY_TRADEOFF: &str = "MBEL-DECISION-032";
pub const DECISION_CONTEXT_PATH_SPACES: &str = "MBEL-DECISION-040";

// Heat validation (MBEL-HEAT-001..070)
pub const HEAT_EMPTY_PATH: &str = "MBEL-HEAT-001";
pub const HEAT_INVALID_PATH: &str = "MBEL-HEAT-002";
pub const HEAT_DUPLICATE: &str = "MBEL-HEAT-003";
pub const HEAT_INVALID_GLOB: &str = "MBEL-HEAT-030";
pub const HEAT_NON_NUMERIC_CHANGES: &str = "MBEL-HEAT-040";
pub const HEAT_EMPTY_FIELD: &str = "MBEL-HEAT-050";
pub const HEAT_EMPTY_DEPENDENT: &str = "MBEL-HEAT-070";

// Intent validation (MBEL-INTENT-001..051)
pub const INTENT_EMPTY_MODULE: &str = "MBEL-INTENT-001";
pub const INTENT_EMPTY_COMPONENT: &str = "MBEL-INTENT-002";
pub const INTENT_DUPLICATE: &str = "MBEL-INTENT-010";
pub const INTENT_EMPTY_CLAUSE: &str = "MBEL-INTENT-020";
pub const INTENT_EMPTY_EXTENDS_ITEM: &str = "MBEL-INTENT-051";

// Unicode typography (MBEL-TYPO-001..012)
pub const TYPO_ARROW_RIGHT: &str = "MBEL-TYPO-001";
pub const TYPO_DOUBLE_ARROW: &str = "MBEL-TYPO-002";
pub const TYPO_ARROW_LEFT: &str = "MBEL-TYPO-003";
pub const TYPO_ARROW_BOTH: &str = "MBEL-TYPO-004";
pub const TYPO_EM_DASH: &str = "MBEL-TYPO-005";
pub const TYPO_CURLY_DOUBLE_OPEN: &str = "MBEL-TYPO-006";
pub const TYPO_CURLY_DOUBLE_CLOSE: &str = "MBEL-TYPO-007";
pub const TYPO_CURLY_SINGLE_OPEN: &str = "MBEL-TYPO-008";
pub const TYPO_CURLY_SINGLE_CLOSE: &str = "MBEL-TYPO-009";
pub const TYPO_ELLIPSIS: &str = "MBEL-TYPO-010";
pub const TYPO_EN_DASH: &str = "MBEL-TYPO-011";
pub const TYPO_NBSP: &str = "MBEL-TYPO-012";

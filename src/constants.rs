//! # Scope Names
//!
//! Canonical option keys and public scope names recognized by the generator.
//! These are the only strings a host ever sees as top-level option keys.

/// Canonical query-parameter keys that use the collapse rule
pub mod params {
    pub const CONDITIONS: &str = "conditions";
    pub const ORDER: &str = "order";
    pub const GROUP: &str = "group";
    pub const HAVING: &str = "having";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const JOINS: &str = "joins";
    pub const SELECT: &str = "select";
    pub const FROM: &str = "from";
    pub const INCLUDE: &str = "include";
}

/// Public names that forward to a differently-named parameter
pub mod aliases {
    pub const WHERE: &str = "where";
    pub const WITH: &str = "with";
}

/// Parameters whose bare invocation means `true`
pub mod switches {
    pub const READONLY: &str = "readonly";
    pub const LOCK: &str = "lock";
}

/// Pass-through scope used as a neutral chain start
pub const ALL: &str = "all";

/// Parameters present in every alias variant, in registration order
pub const COMMON_PARAMETERS: [&str; 9] = [
    params::CONDITIONS,
    params::ORDER,
    params::GROUP,
    params::HAVING,
    params::LIMIT,
    params::OFFSET,
    params::JOINS,
    params::SELECT,
    params::FROM,
];

pub const BOOLEAN_SWITCHES: [&str; 2] = [switches::READONLY, switches::LOCK];

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SCOPES";

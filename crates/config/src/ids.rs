//! Newtype identifiers for scenario entities.
//!
//! Plain `String` ids are easy to transpose (server id where an edge id was
//! expected); newtypes catch that at compile time the way `otap-df-config`'s
//! `NodeId`/`PipelineId` do.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

id_newtype!(ServerId);
id_newtype!(EdgeId);
id_newtype!(ClientId);
id_newtype!(LoadBalancerId);
id_newtype!(GeneratorId);
id_newtype!(EventId);

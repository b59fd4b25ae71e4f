use crate::config::models::ConfigOpts;
use serde::Serialize;
use std::fmt::{Debug, Display};

fn __display<T>(opt: Option<&T>) -> String
where
    T: Serialize + Debug,
{
    if let Some(opt) = opt {
        match ron::to_string(opt) {
            Ok(ron) => ron,
            Err(_) => format!("{:?}", opt),
        }
    } else {
        "None".to_string()
    }
}

/// Show only enough of a secret to recognize it.
fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    if shown.len() < secret.len() {
        format!("\"{shown}...\"")
    } else {
        "\"****\"".to_string()
    }
}

impl Display for ConfigOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Auth email: {}", __display(self.auth_email.as_ref()))?;
        writeln!(
            f,
            "Auth key: {}",
            self.auth_key
                .as_deref()
                .map(mask)
                .unwrap_or_else(|| "None".to_string())
        )?;
        writeln!(
            f,
            "Redis compatibility: {}",
            __display(self.enable_redis_compatibility.as_ref())
        )?;
        write!(
            f,
            "Strict operations: {}",
            __display(self.strict_attributes.as_ref())
        )
    }
}

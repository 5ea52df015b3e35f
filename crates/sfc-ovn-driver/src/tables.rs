//! Steering-rule constants for emitted flow classifier rows.

use uuid::Uuid;

/// Action redirecting matched traffic into the chain.
pub const RULE_ACTION: &str = "sfc";

/// Priority of emitted steering rules.
pub const RULE_PRIORITY: i64 = 2000;

/// Direction of emitted steering rules.
pub const RULE_DIRECTION: &str = "from-lport";

/// Builds the match expression for a steering rule from resolved
/// source and destination port row ids.
pub fn steering_match(inport: Uuid, outport: Uuid) -> String {
    format!("inport == {} && outport == {}", inport, outport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steering_match_shape() {
        let src = Uuid::new_v4();
        let dst = Uuid::new_v4();
        let expr = steering_match(src, dst);

        assert_eq!(expr, format!("inport == {} && outport == {}", src, dst));
    }
}

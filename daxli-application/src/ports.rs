use crate::{error::LedgerParseError, model::ParsedLedger};
use daxli_domain::MemberId;
use std::collections::HashMap;

pub trait LedgerParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<ParsedLedger, LedgerParseError>;
}

pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: MemberId) -> Option<&str>;
}

impl MemberDirectory for HashMap<MemberId, String> {
    fn display_name(&self, member_id: MemberId) -> Option<&str> {
        self.get(&member_id).map(String::as_str)
    }
}

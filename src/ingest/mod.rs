pub mod classifier;
pub mod parser;
pub mod puzzle;
pub mod resolver;

pub use classifier::{classify, Announcement};
pub use parser::{parse_results, MentionToken, ParsedResult, FAILURE_ATTEMPTS};
pub use resolver::{
    resolve, DirectoryError, EmptyDirectory, InMemoryMemberDirectory, Member, MemberDirectory,
    ResolvedParticipant,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::parser::MentionToken;

/// Prefix for participant keys synthesized from a bare display name
pub const NAME_KEY_PREFIX: &str = "name:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub display_name: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Lookup over the chat platform's membership directory
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn by_id(&self, id: u64) -> Result<Option<Member>, DirectoryError>;

    /// All members whose display name equals `name`, ignoring case
    async fn by_name(&self, name: &str) -> Result<Vec<Member>, DirectoryError>;
}

/// Stable identity for a mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParticipant {
    pub id: String,
    pub display_name: String,
    /// False when the identity was synthesized because the directory had no match
    pub resolved: bool,
}

impl ResolvedParticipant {
    fn from_member(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            display_name: member.display_name,
            resolved: true,
        }
    }
}

/// Maps a mention token to a participant, falling back to a synthesized
/// identity when the directory cannot resolve it.
pub async fn resolve(
    directory: &dyn MemberDirectory,
    mention: &MentionToken,
) -> ResolvedParticipant {
    match mention {
        MentionToken::UserId(id) => match directory.by_id(*id).await {
            Ok(Some(member)) => ResolvedParticipant::from_member(member),
            Ok(None) => {
                debug!(user_id = id, "Mention not found in directory");
                fallback_for_id(*id)
            }
            Err(err) => {
                warn!(error = %err, user_id = id, "Directory lookup by id failed");
                fallback_for_id(*id)
            }
        },
        MentionToken::Name(name) => match directory.by_name(name).await {
            Ok(mut matches) if matches.len() == 1 => match matches.pop() {
                Some(member) => ResolvedParticipant::from_member(member),
                None => fallback_for_name(name),
            },
            Ok(matches) => {
                debug!(name = %name, matches = matches.len(), "Name mention not uniquely resolvable");
                fallback_for_name(name)
            }
            Err(err) => {
                warn!(error = %err, name = %name, "Directory lookup by name failed");
                fallback_for_name(name)
            }
        },
    }
}

fn fallback_for_id(id: u64) -> ResolvedParticipant {
    ResolvedParticipant {
        id: id.to_string(),
        display_name: format!("<@{id}>"),
        resolved: false,
    }
}

fn fallback_for_name(name: &str) -> ResolvedParticipant {
    ResolvedParticipant {
        id: format!("{NAME_KEY_PREFIX}{}", name.to_lowercase()),
        display_name: name.to_string(),
        resolved: false,
    }
}

/// Directory that knows nobody; every mention falls back
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDirectory;

#[async_trait]
impl MemberDirectory for EmptyDirectory {
    async fn by_id(&self, _id: u64) -> Result<Option<Member>, DirectoryError> {
        Ok(None)
    }

    async fn by_name(&self, _name: &str) -> Result<Vec<Member>, DirectoryError> {
        Ok(Vec::new())
    }
}

/// In-memory directory, populated by whoever owns the chat connection
#[derive(Debug, Default, Clone)]
pub struct InMemoryMemberDirectory {
    members: Arc<RwLock<HashMap<u64, String>>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        let map = members
            .into_iter()
            .map(|member| (member.id, member.display_name))
            .collect();
        Self {
            members: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or renames a member
    pub async fn upsert(&self, member: Member) {
        self.members
            .write()
            .await
            .insert(member.id, member.display_name);
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn by_id(&self, id: u64) -> Result<Option<Member>, DirectoryError> {
        let members = self.members.read().await;
        Ok(members.get(&id).map(|display_name| Member {
            id,
            display_name: display_name.clone(),
        }))
    }

    async fn by_name(&self, name: &str) -> Result<Vec<Member>, DirectoryError> {
        let wanted = name.to_lowercase();
        let members = self.members.read().await;
        let mut matches: Vec<Member> = members
            .iter()
            .filter(|(_, display_name)| display_name.to_lowercase() == wanted)
            .map(|(id, display_name)| Member {
                id: *id,
                display_name: display_name.clone(),
            })
            .collect();
        matches.sort_by_key(|member| member.id);
        Ok(matches)
    }
}

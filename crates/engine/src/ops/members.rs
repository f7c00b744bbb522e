use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Directory, EngineError, Member, NewMemberCmd, ResultEngine, members,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

/// Loads every profile, ordered by display name.
pub(super) async fn load_directory<C: ConnectionTrait>(db: &C) -> ResultEngine<Directory> {
    let models = members::Entity::find()
        .order_by_asc(members::Column::DisplayName)
        .order_by_asc(members::Column::Id)
        .all(db)
        .await?;
    models.into_iter().map(Member::try_from).collect()
}

impl Engine {
    /// Snapshot of the member directory.
    pub async fn directory(&self) -> ResultEngine<Directory> {
        load_directory(&self.database).await
    }

    /// Looks up a single member.
    pub async fn member(&self, member_id: Uuid) -> ResultEngine<Member> {
        members::Entity::find_by_id(member_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::UnknownMember(member_id.to_string()))
            .and_then(Member::try_from)
    }

    /// Registers a new member and returns its id.
    ///
    /// A guardian can only be given to a proxy, and must be an existing
    /// non-proxy member.
    pub async fn add_member(&self, cmd: NewMemberCmd) -> ResultEngine<Uuid> {
        let NewMemberCmd {
            display_name,
            is_admin,
            is_proxy,
            guardian_id,
        } = cmd;
        let display_name = normalize_required_text(&display_name, "display name")?;
        if !is_proxy && guardian_id.is_some() {
            return Err(EngineError::Validation(
                "only proxy members can have a guardian".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if let Some(guardian_id) = guardian_id {
                let guardian = members::Entity::find_by_id(guardian_id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::UnknownMember(guardian_id.to_string()))?;
                if guardian.is_proxy {
                    return Err(EngineError::InvalidResponsibleParty(format!(
                        "{} is a proxy member",
                        guardian.display_name
                    )));
                }
            }

            let mut member = if is_proxy {
                Member::proxy(display_name, guardian_id)
            } else {
                Member::new(display_name)
            };
            member.is_admin = is_admin;

            members::ActiveModel::from(&member).insert(&db_tx).await?;
            Ok(member.id)
        })
    }
}

//! Member directory.
//!
//! Members live in the `profiles` table. The engine only ever reads them
//! through a [`Directory`] snapshot, which is what the allocation engine
//! resolves consumers and responsible parties against.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// A group member.
///
/// A proxy member (a minor, a guest) can consume a share of an expense but can
/// never owe money: their share is redirected to a guardian.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub display_name: String,
    pub is_admin: bool,
    pub is_proxy: bool,
    /// Only meaningful when `is_proxy` is `true`.
    pub guardian_id: Option<Uuid>,
}

impl Member {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            is_admin: false,
            is_proxy: false,
            guardian_id: None,
        }
    }

    pub fn proxy(display_name: impl Into<String>, guardian_id: Option<Uuid>) -> Self {
        Self {
            is_proxy: true,
            guardian_id,
            ..Self::new(display_name)
        }
    }

    #[must_use]
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// The guardian, ignoring whatever is stored for non-proxy members.
    pub fn guardian(&self) -> Option<Uuid> {
        if self.is_proxy { self.guardian_id } else { None }
    }

    /// Who owes this member's share when nobody overrides it.
    ///
    /// Non-proxies owe their own share. Proxies fall back to their guardian,
    /// then to the expense payer; `None` when neither is known.
    pub fn default_responsible(&self, payer_id: Option<Uuid>) -> Option<Uuid> {
        if self.is_proxy {
            self.guardian().or(payer_id)
        } else {
            Some(self.id)
        }
    }
}

/// Read-only snapshot of the member directory.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    members: Vec<Member>,
}

impl Directory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, id: Uuid) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn require(&self, id: Uuid) -> ResultEngine<&Member> {
        self.get(id)
            .ok_or_else(|| EngineError::UnknownMember(id.to_string()))
    }

    /// Members that may bear responsibility for a split (everyone but proxies).
    pub fn responsible_candidates(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|member| !member.is_proxy)
    }

    /// Checks that `id` exists and is allowed to owe money.
    pub(crate) fn require_responsible(&self, id: Uuid) -> ResultEngine<&Member> {
        let member = self.get(id).ok_or_else(|| {
            EngineError::InvalidResponsibleParty(format!("member {id} does not exist"))
        })?;
        if member.is_proxy {
            return Err(EngineError::InvalidResponsibleParty(format!(
                "{} is a proxy member",
                member.display_name
            )));
        }
        Ok(member)
    }
}

impl FromIterator<Member> for Directory {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_proxy: bool,
    pub guardian_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Member> for ActiveModel {
    fn from(member: &Member) -> Self {
        Self {
            id: ActiveValue::Set(member.id.to_string()),
            display_name: ActiveValue::Set(member.display_name.clone()),
            is_admin: ActiveValue::Set(member.is_admin),
            is_proxy: ActiveValue::Set(member.is_proxy),
            guardian_id: ActiveValue::Set(member.guardian().map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Member {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "member")?,
            display_name: model.display_name,
            is_admin: model.is_admin,
            is_proxy: model.is_proxy,
            guardian_id: model
                .guardian_id
                .as_deref()
                .map(|id| parse_uuid(id, "guardian"))
                .transpose()?,
        })
    }
}

//! [`Command`] for attaching an [`Image`] to a [`House`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        house::{self, Image},
        user, House,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for attaching an [`Image`] to a [`House`].
#[derive(Clone, Debug)]
pub struct AttachHouseImage {
    /// ID of the [`User`] attaching the [`Image`].
    ///
    /// [`User`]: crate::domain::User
    pub landlord_id: user::Id,

    /// ID of the [`House`] to attach the [`Image`] to.
    pub house_id: house::Id,

    /// URL of the [`Image`].
    pub url: house::ImageUrl,

    /// Optional [`house::Caption`] of the [`Image`].
    pub caption: Option<house::Caption>,

    /// Indicator whether the [`Image`] is the primary one of its [`House`].
    pub is_primary: bool,
}

impl<Db, M> Command<AttachHouseImage> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<House>, house::Id>>,
            Ok = Option<House>,
            Err = Traced<database::Error>,
        > + Database<Insert<Image>, Err = Traced<database::Error>>,
{
    type Ok = Image;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AttachHouseImage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AttachHouseImage {
            landlord_id,
            house_id,
            url,
            caption,
            is_primary,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<House>, _>::new(house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `House` is not distinguishable from a missing one.
            .filter(|h| h.landlord_id == landlord_id)
            .ok_or(E::HouseNotExists(house_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let image = Image {
            id: house::ImageId::new(),
            house_id,
            url,
            caption,
            is_primary,
            uploaded_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(image.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(image)
    }
}

/// Error of [`AttachHouseImage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`House`] with the provided ID does not exist (or is not owned by the
    /// acting landlord).
    #[display("`House(id: {_0})` does not exist")]
    HouseNotExists(#[error(not(source))] house::Id),
}

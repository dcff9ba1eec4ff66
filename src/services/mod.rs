pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::models::{
    DbInfo, Friend, FriendCuDto, Pet, PetCuDto, Quote, QuoteCuDto, RespPageDto, UserDto,
    UsersInfo,
};

/// Typed failures from the service collaborators. The HTTP boundary maps
/// these onto status codes per operation; no message-text matching anywhere.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Item with id {0} does not exist")]
    NotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Resource collaborator for friends, pets and quotes, plus demo-data
/// seeding. The HTTP layer passes DTOs through unchanged in both directions.
#[async_trait]
pub trait FriendsService: Send + Sync {
    async fn read_friends(
        &self,
        usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Friend>>;
    async fn read_friend(&self, usr: &SessionUser, id: Uuid, flat: bool)
        -> ServiceResult<Option<Friend>>;
    async fn create_friend(&self, usr: &SessionUser, dto: &FriendCuDto) -> ServiceResult<Friend>;
    async fn update_friend(&self, usr: &SessionUser, dto: &FriendCuDto) -> ServiceResult<Friend>;
    async fn delete_friend(&self, usr: &SessionUser, id: Uuid) -> ServiceResult<Friend>;

    async fn read_pets(
        &self,
        usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Pet>>;
    async fn read_pet(&self, usr: &SessionUser, id: Uuid, flat: bool) -> ServiceResult<Option<Pet>>;
    async fn create_pet(&self, usr: &SessionUser, dto: &PetCuDto) -> ServiceResult<Pet>;
    async fn update_pet(&self, usr: &SessionUser, dto: &PetCuDto) -> ServiceResult<Pet>;
    async fn delete_pet(&self, usr: &SessionUser, id: Uuid) -> ServiceResult<Pet>;

    async fn read_quotes(
        &self,
        usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Quote>>;
    async fn read_quote(
        &self,
        usr: &SessionUser,
        id: Uuid,
        flat: bool,
    ) -> ServiceResult<Option<Quote>>;
    async fn create_quote(&self, usr: &SessionUser, dto: &QuoteCuDto) -> ServiceResult<Quote>;
    async fn update_quote(&self, usr: &SessionUser, dto: &QuoteCuDto) -> ServiceResult<Quote>;
    async fn delete_quote(&self, usr: &SessionUser, id: Uuid) -> ServiceResult<Quote>;

    async fn seed(&self, usr: &SessionUser, count: usize) -> ServiceResult<DbInfo>;
    async fn remove_seed(&self, usr: &SessionUser, seeded: bool) -> ServiceResult<DbInfo>;
}

/// Login collaborator: credential verification and demo-user seeding.
#[async_trait]
pub trait LoginService: Send + Sync {
    async fn login_user(&self, user_name: &str, password: &str) -> ServiceResult<UserDto>;
    async fn seed_users(
        &self,
        count_usr: usize,
        count_sup_usr: usize,
    ) -> ServiceResult<UsersInfo>;
}

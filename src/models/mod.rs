use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A page of items together with its paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespPageDto<T> {
    pub db_items_count: usize,
    pub page_nr: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub page_items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetKind {
    Dog,
    Cat,
    Fish,
    Bird,
    Rabbit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetMood {
    Happy,
    Sad,
    Grumpy,
    Sleepy,
    Playful,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub friend_id: Uuid,
    pub seeded: bool,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    /// Present only on non-flat reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Pet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<Quote>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub pet_id: Uuid,
    pub seeded: bool,
    pub kind: PetKind,
    pub mood: PetMood,
    pub name: String,
    /// Owner, embedded flat; present only on non-flat reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend: Option<Box<Friend>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: Uuid,
    pub seeded: bool,
    pub quote: String,
    pub author: String,
    /// Present only on non-flat reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends: Option<Vec<Friend>>,
}

/// Create/update shape for a friend. The id is absent on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendCuDto {
    #[serde(default)]
    pub friend_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub pets_id: Vec<Uuid>,
    #[serde(default)]
    pub quotes_id: Vec<Uuid>,
}

impl From<&Friend> for FriendCuDto {
    fn from(item: &Friend) -> Self {
        Self {
            friend_id: Some(item.friend_id),
            first_name: item.first_name.clone(),
            last_name: item.last_name.clone(),
            email: item.email.clone(),
            birthday: item.birthday,
            pets_id: item
                .pets
                .iter()
                .flatten()
                .map(|p| p.pet_id)
                .collect(),
            quotes_id: item
                .quotes
                .iter()
                .flatten()
                .map(|q| q.quote_id)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetCuDto {
    #[serde(default)]
    pub pet_id: Option<Uuid>,
    pub friend_id: Uuid,
    pub kind: PetKind,
    pub mood: PetMood,
    pub name: String,
}

impl From<&Pet> for PetCuDto {
    fn from(item: &Pet) -> Self {
        Self {
            pet_id: Some(item.pet_id),
            friend_id: item
                .friend
                .as_ref()
                .map(|f| f.friend_id)
                .unwrap_or_default(),
            kind: item.kind,
            mood: item.mood,
            name: item.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCuDto {
    #[serde(default)]
    pub quote_id: Option<Uuid>,
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub friends_id: Vec<Uuid>,
}

impl From<&Quote> for QuoteCuDto {
    fn from(item: &Quote) -> Self {
        Self {
            quote_id: Some(item.quote_id),
            quote: item.quote.clone(),
            author: item.author.clone(),
            friends_id: item
                .friends
                .iter()
                .flatten()
                .map(|f| f.friend_id)
                .collect(),
        }
    }
}

/// Seeded/unseeded counts for one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCount {
    pub nr_seeded_items: usize,
    pub nr_unseeded_items: usize,
}

/// Seed summary across the three collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbInfo {
    pub friends: ItemCount,
    pub pets: ItemCount,
    pub quotes: ItemCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersInfo {
    pub nr_seeded_users: usize,
    pub nr_seeded_super_users: usize,
}

/// Public view of a login account; the password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: Uuid,
    pub user_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub user_name: String,
    pub password: String,
}

/// Response of a successful login: the issued token plus who it is for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSessionDto {
    pub token: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub role: String,
}

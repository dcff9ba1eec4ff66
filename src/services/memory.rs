use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{self, SessionUser};
use crate::config::AppConfig;
use crate::models::{
    DbInfo, Friend, FriendCuDto, ItemCount, Pet, PetCuDto, PetKind, PetMood, Quote, QuoteCuDto,
    RespPageDto, UserDto, UsersInfo,
};
use crate::services::{FriendsService, LoginService, ServiceError, ServiceResult};

/// In-memory implementation of the service collaborators. Tables live behind
/// one RwLock; critical sections are short and never await.
pub struct InMemoryStore {
    config: Arc<AppConfig>,
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    friends: HashMap<Uuid, FriendRow>,
    pets: HashMap<Uuid, PetRow>,
    quotes: HashMap<Uuid, QuoteRow>,
    users: HashMap<Uuid, UserRow>,
}

#[derive(Clone)]
struct FriendRow {
    id: Uuid,
    seeded: bool,
    first_name: String,
    last_name: String,
    email: Option<String>,
    birthday: Option<NaiveDate>,
}

#[derive(Clone)]
struct PetRow {
    id: Uuid,
    seeded: bool,
    friend_id: Uuid,
    kind: PetKind,
    mood: PetMood,
    name: String,
}

#[derive(Clone)]
struct QuoteRow {
    id: Uuid,
    seeded: bool,
    quote: String,
    author: String,
    friend_ids: Vec<Uuid>,
}

#[derive(Clone)]
struct UserRow {
    id: Uuid,
    seeded: bool,
    user_name: String,
    password_hash: String,
    role: String,
}

/// Built-in superuser so the role-gated seeding surface is reachable on a
/// fresh process. Meant for demo deployments only.
const BOOTSTRAP_USER: &str = "sysadmin";
const BOOTSTRAP_PASSWORD: &str = "sysadmin";

impl InMemoryStore {
    pub fn bootstrap(config: Arc<AppConfig>) -> Self {
        let mut tables = Tables::default();
        let hash = auth::hash_password(config.password_salt(), BOOTSTRAP_PASSWORD);
        let id = Uuid::new_v4();
        tables.users.insert(
            id,
            UserRow {
                id,
                seeded: false,
                user_name: BOOTSTRAP_USER.to_string(),
                password_hash: hash,
                role: "supusr".to_string(),
            },
        );
        Self {
            config,
            inner: RwLock::new(tables),
        }
    }
}

impl Tables {
    fn friend_view(&self, row: &FriendRow, flat: bool) -> Friend {
        let (pets, quotes) = if flat {
            (None, None)
        } else {
            let mut pets: Vec<Pet> = self
                .pets
                .values()
                .filter(|p| p.friend_id == row.id)
                .map(|p| self.pet_view(p, true))
                .collect();
            pets.sort_by(|a, b| (&a.name, a.pet_id).cmp(&(&b.name, b.pet_id)));

            let mut quotes: Vec<Quote> = self
                .quotes
                .values()
                .filter(|q| q.friend_ids.contains(&row.id))
                .map(|q| self.quote_view(q, true))
                .collect();
            quotes.sort_by(|a, b| (&a.author, a.quote_id).cmp(&(&b.author, b.quote_id)));

            (Some(pets), Some(quotes))
        };

        Friend {
            friend_id: row.id,
            seeded: row.seeded,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            email: row.email.clone(),
            birthday: row.birthday,
            pets,
            quotes,
        }
    }

    fn pet_view(&self, row: &PetRow, flat: bool) -> Pet {
        let friend = if flat {
            None
        } else {
            self.friends
                .get(&row.friend_id)
                .map(|f| Box::new(self.friend_view(f, true)))
        };
        Pet {
            pet_id: row.id,
            seeded: row.seeded,
            kind: row.kind,
            mood: row.mood,
            name: row.name.clone(),
            friend,
        }
    }

    fn quote_view(&self, row: &QuoteRow, flat: bool) -> Quote {
        let friends = if flat {
            None
        } else {
            let mut friends: Vec<Friend> = row
                .friend_ids
                .iter()
                .filter_map(|id| self.friends.get(id))
                .map(|f| self.friend_view(f, true))
                .collect();
            friends.sort_by(|a, b| {
                (&a.last_name, &a.first_name, a.friend_id)
                    .cmp(&(&b.last_name, &b.first_name, b.friend_id))
            });
            Some(friends)
        };
        Quote {
            quote_id: row.id,
            seeded: row.seeded,
            quote: row.quote.clone(),
            author: row.author.clone(),
            friends,
        }
    }

    fn db_info(&self) -> DbInfo {
        fn count<I: Iterator<Item = bool>>(seeded_flags: I) -> ItemCount {
            let mut c = ItemCount {
                nr_seeded_items: 0,
                nr_unseeded_items: 0,
            };
            for seeded in seeded_flags {
                if seeded {
                    c.nr_seeded_items += 1;
                } else {
                    c.nr_unseeded_items += 1;
                }
            }
            c
        }
        DbInfo {
            friends: count(self.friends.values().map(|r| r.seeded)),
            pets: count(self.pets.values().map(|r| r.seeded)),
            quotes: count(self.quotes.values().map(|r| r.seeded)),
        }
    }

    /// Link the listed pets and quotes to a friend, failing if any id does
    /// not exist. Pets are reassigned to this owner; quotes gain this friend.
    fn link_friend(
        &mut self,
        friend_id: Uuid,
        pets_id: &[Uuid],
        quotes_id: &[Uuid],
    ) -> ServiceResult<()> {
        for id in pets_id {
            if !self.pets.contains_key(id) {
                return Err(ServiceError::NotFound(*id));
            }
        }
        for id in quotes_id {
            if !self.quotes.contains_key(id) {
                return Err(ServiceError::NotFound(*id));
            }
        }
        for id in pets_id {
            if let Some(pet) = self.pets.get_mut(id) {
                pet.friend_id = friend_id;
            }
        }
        for id in quotes_id {
            if let Some(quote) = self.quotes.get_mut(id) {
                if !quote.friend_ids.contains(&friend_id) {
                    quote.friend_ids.push(friend_id);
                }
            }
        }
        Ok(())
    }
}

fn page<T>(
    mut items: Vec<T>,
    page_nr: usize,
    page_size: usize,
) -> ServiceResult<RespPageDto<T>> {
    if page_size == 0 {
        return Err(ServiceError::Invalid("pageSize must be greater than zero".into()));
    }
    let db_items_count = items.len();
    let page_count = db_items_count.div_ceil(page_size);
    let start = page_nr.saturating_mul(page_size).min(db_items_count);
    let end = start.saturating_add(page_size).min(db_items_count);
    let page_items = items.drain(start..end).collect();
    Ok(RespPageDto {
        db_items_count,
        page_nr,
        page_size,
        page_count,
        page_items,
    })
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn require_text(value: &str, what: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Invalid(format!("{} must not be empty", what)));
    }
    Ok(())
}

#[async_trait]
impl FriendsService for InMemoryStore {
    async fn read_friends(
        &self,
        _usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Friend>> {
        let tables = self.inner.read().await;
        let mut rows: Vec<&FriendRow> = tables
            .friends
            .values()
            .filter(|r| r.seeded == seeded)
            .filter(|r| match filter {
                Some(f) => {
                    contains(&r.first_name, f)
                        || contains(&r.last_name, f)
                        || r.email.as_deref().is_some_and(|e| contains(e, f))
                }
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        let items = rows
            .into_iter()
            .map(|r| tables.friend_view(r, flat))
            .collect();
        page(items, page_nr, page_size)
    }

    async fn read_friend(
        &self,
        _usr: &SessionUser,
        id: Uuid,
        flat: bool,
    ) -> ServiceResult<Option<Friend>> {
        let tables = self.inner.read().await;
        Ok(tables.friends.get(&id).map(|r| tables.friend_view(r, flat)))
    }

    async fn create_friend(&self, _usr: &SessionUser, dto: &FriendCuDto) -> ServiceResult<Friend> {
        require_text(&dto.first_name, "firstName")?;
        require_text(&dto.last_name, "lastName")?;

        let mut tables = self.inner.write().await;
        let id = dto.friend_id.unwrap_or_else(Uuid::new_v4);
        if tables.friends.contains_key(&id) {
            return Err(ServiceError::Invalid(format!("Item with id {} already exists", id)));
        }
        tables.link_friend(id, &dto.pets_id, &dto.quotes_id)?;
        let row = FriendRow {
            id,
            seeded: false,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            birthday: dto.birthday,
        };
        tables.friends.insert(id, row.clone());
        Ok(tables.friend_view(&row, true))
    }

    async fn update_friend(&self, _usr: &SessionUser, dto: &FriendCuDto) -> ServiceResult<Friend> {
        let id = dto
            .friend_id
            .ok_or_else(|| ServiceError::Invalid("friendId is required".into()))?;
        require_text(&dto.first_name, "firstName")?;
        require_text(&dto.last_name, "lastName")?;

        let mut tables = self.inner.write().await;
        if !tables.friends.contains_key(&id) {
            return Err(ServiceError::NotFound(id));
        }
        tables.link_friend(id, &dto.pets_id, &dto.quotes_id)?;
        let row = tables.friends.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        row.first_name = dto.first_name.clone();
        row.last_name = dto.last_name.clone();
        row.email = dto.email.clone();
        row.birthday = dto.birthday;
        let row = row.clone();
        Ok(tables.friend_view(&row, true))
    }

    async fn delete_friend(&self, _usr: &SessionUser, id: Uuid) -> ServiceResult<Friend> {
        let mut tables = self.inner.write().await;
        let row = tables.friends.remove(&id).ok_or(ServiceError::NotFound(id))?;
        // Owned pets go with the friend; quote links are detached.
        tables.pets.retain(|_, p| p.friend_id != id);
        for quote in tables.quotes.values_mut() {
            quote.friend_ids.retain(|f| *f != id);
        }
        Ok(tables.friend_view(&row, true))
    }

    async fn read_pets(
        &self,
        _usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Pet>> {
        let tables = self.inner.read().await;
        let mut rows: Vec<&PetRow> = tables
            .pets
            .values()
            .filter(|r| r.seeded == seeded)
            .filter(|r| match filter {
                Some(f) => {
                    contains(&r.name, f)
                        || contains(&format!("{:?}", r.kind), f)
                        || contains(&format!("{:?}", r.mood), f)
                }
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        let items = rows.into_iter().map(|r| tables.pet_view(r, flat)).collect();
        page(items, page_nr, page_size)
    }

    async fn read_pet(
        &self,
        _usr: &SessionUser,
        id: Uuid,
        flat: bool,
    ) -> ServiceResult<Option<Pet>> {
        let tables = self.inner.read().await;
        Ok(tables.pets.get(&id).map(|r| tables.pet_view(r, flat)))
    }

    async fn create_pet(&self, _usr: &SessionUser, dto: &PetCuDto) -> ServiceResult<Pet> {
        require_text(&dto.name, "name")?;

        let mut tables = self.inner.write().await;
        if !tables.friends.contains_key(&dto.friend_id) {
            return Err(ServiceError::NotFound(dto.friend_id));
        }
        let id = dto.pet_id.unwrap_or_else(Uuid::new_v4);
        if tables.pets.contains_key(&id) {
            return Err(ServiceError::Invalid(format!("Item with id {} already exists", id)));
        }
        let row = PetRow {
            id,
            seeded: false,
            friend_id: dto.friend_id,
            kind: dto.kind,
            mood: dto.mood,
            name: dto.name.clone(),
        };
        tables.pets.insert(id, row.clone());
        Ok(tables.pet_view(&row, true))
    }

    async fn update_pet(&self, _usr: &SessionUser, dto: &PetCuDto) -> ServiceResult<Pet> {
        let id = dto
            .pet_id
            .ok_or_else(|| ServiceError::Invalid("petId is required".into()))?;
        require_text(&dto.name, "name")?;

        let mut tables = self.inner.write().await;
        if !tables.friends.contains_key(&dto.friend_id) {
            return Err(ServiceError::NotFound(dto.friend_id));
        }
        let row = tables.pets.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        row.friend_id = dto.friend_id;
        row.kind = dto.kind;
        row.mood = dto.mood;
        row.name = dto.name.clone();
        let row = row.clone();
        Ok(tables.pet_view(&row, true))
    }

    async fn delete_pet(&self, _usr: &SessionUser, id: Uuid) -> ServiceResult<Pet> {
        let mut tables = self.inner.write().await;
        let row = tables.pets.remove(&id).ok_or(ServiceError::NotFound(id))?;
        Ok(tables.pet_view(&row, true))
    }

    async fn read_quotes(
        &self,
        _usr: &SessionUser,
        seeded: bool,
        flat: bool,
        filter: Option<&str>,
        page_nr: usize,
        page_size: usize,
    ) -> ServiceResult<RespPageDto<Quote>> {
        let tables = self.inner.read().await;
        let mut rows: Vec<&QuoteRow> = tables
            .quotes
            .values()
            .filter(|r| r.seeded == seeded)
            .filter(|r| match filter {
                Some(f) => contains(&r.quote, f) || contains(&r.author, f),
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| (&a.author, &a.quote, a.id).cmp(&(&b.author, &b.quote, b.id)));
        let items = rows
            .into_iter()
            .map(|r| tables.quote_view(r, flat))
            .collect();
        page(items, page_nr, page_size)
    }

    async fn read_quote(
        &self,
        _usr: &SessionUser,
        id: Uuid,
        flat: bool,
    ) -> ServiceResult<Option<Quote>> {
        let tables = self.inner.read().await;
        Ok(tables.quotes.get(&id).map(|r| tables.quote_view(r, flat)))
    }

    async fn create_quote(&self, _usr: &SessionUser, dto: &QuoteCuDto) -> ServiceResult<Quote> {
        require_text(&dto.quote, "quote")?;
        require_text(&dto.author, "author")?;

        let mut tables = self.inner.write().await;
        for friend_id in &dto.friends_id {
            if !tables.friends.contains_key(friend_id) {
                return Err(ServiceError::NotFound(*friend_id));
            }
        }
        let id = dto.quote_id.unwrap_or_else(Uuid::new_v4);
        if tables.quotes.contains_key(&id) {
            return Err(ServiceError::Invalid(format!("Item with id {} already exists", id)));
        }
        let row = QuoteRow {
            id,
            seeded: false,
            quote: dto.quote.clone(),
            author: dto.author.clone(),
            friend_ids: dto.friends_id.clone(),
        };
        tables.quotes.insert(id, row.clone());
        Ok(tables.quote_view(&row, true))
    }

    async fn update_quote(&self, _usr: &SessionUser, dto: &QuoteCuDto) -> ServiceResult<Quote> {
        let id = dto
            .quote_id
            .ok_or_else(|| ServiceError::Invalid("quoteId is required".into()))?;
        require_text(&dto.quote, "quote")?;
        require_text(&dto.author, "author")?;

        let mut tables = self.inner.write().await;
        for friend_id in &dto.friends_id {
            if !tables.friends.contains_key(friend_id) {
                return Err(ServiceError::NotFound(*friend_id));
            }
        }
        let row = tables.quotes.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        row.quote = dto.quote.clone();
        row.author = dto.author.clone();
        row.friend_ids = dto.friends_id.clone();
        let row = row.clone();
        Ok(tables.quote_view(&row, true))
    }

    async fn delete_quote(&self, _usr: &SessionUser, id: Uuid) -> ServiceResult<Quote> {
        let mut tables = self.inner.write().await;
        let row = tables.quotes.remove(&id).ok_or(ServiceError::NotFound(id))?;
        Ok(tables.quote_view(&row, true))
    }

    async fn seed(&self, _usr: &SessionUser, count: usize) -> ServiceResult<DbInfo> {
        let mut tables = self.inner.write().await;
        // ThreadRng is !Send; it must not exist before the await above.
        let mut rng = rand::thread_rng();

        let mut friend_ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = Uuid::new_v4();
            let first_name = *FIRST_NAMES.choose(&mut rng).unwrap_or(&"Kim");
            let last_name = *LAST_NAMES.choose(&mut rng).unwrap_or(&"Larsson");
            tables.friends.insert(
                id,
                FriendRow {
                    id,
                    seeded: true,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    email: Some(format!(
                        "{}.{}@gmail.com",
                        first_name.to_lowercase(),
                        last_name.to_lowercase()
                    )),
                    birthday: NaiveDate::from_ymd_opt(
                        rng.gen_range(1950..2010),
                        rng.gen_range(1..=12),
                        rng.gen_range(1..=28),
                    ),
                },
            );
            friend_ids.push(id);

            for _ in 0..rng.gen_range(0..=3) {
                let pet_id = Uuid::new_v4();
                tables.pets.insert(
                    pet_id,
                    PetRow {
                        id: pet_id,
                        seeded: true,
                        friend_id: id,
                        kind: *PET_KINDS.choose(&mut rng).unwrap_or(&PetKind::Dog),
                        mood: *PET_MOODS.choose(&mut rng).unwrap_or(&PetMood::Happy),
                        name: PET_NAMES.choose(&mut rng).unwrap_or(&"Rex").to_string(),
                    },
                );
            }
        }

        for _ in 0..count / 3 + 1 {
            let quote_id = Uuid::new_v4();
            let (quote, author) = *QUOTES.choose(&mut rng).unwrap_or(&QUOTES[0]);
            let nr_friends = rng.gen_range(1..=3.min(friend_ids.len().max(1)));
            let linked: Vec<Uuid> = friend_ids
                .choose_multiple(&mut rng, nr_friends)
                .copied()
                .collect();
            tables.quotes.insert(
                quote_id,
                QuoteRow {
                    id: quote_id,
                    seeded: true,
                    quote: quote.to_string(),
                    author: author.to_string(),
                    friend_ids: linked,
                },
            );
        }

        Ok(tables.db_info())
    }

    async fn remove_seed(&self, _usr: &SessionUser, seeded: bool) -> ServiceResult<DbInfo> {
        let mut tables = self.inner.write().await;
        let removed: Vec<Uuid> = tables
            .friends
            .values()
            .filter(|r| r.seeded == seeded)
            .map(|r| r.id)
            .collect();
        tables.friends.retain(|_, r| r.seeded != seeded);
        // Pets go with their owner, whatever their own flag says.
        tables
            .pets
            .retain(|_, r| r.seeded != seeded && !removed.contains(&r.friend_id));
        tables.quotes.retain(|_, r| r.seeded != seeded);
        for quote in tables.quotes.values_mut() {
            quote.friend_ids.retain(|id| !removed.contains(id));
        }
        Ok(tables.db_info())
    }
}

#[async_trait]
impl LoginService for InMemoryStore {
    async fn login_user(&self, user_name: &str, password: &str) -> ServiceResult<UserDto> {
        let wanted = user_name.trim().to_lowercase();
        let hash = auth::hash_password(self.config.password_salt(), password);

        let tables = self.inner.read().await;
        let user = tables
            .users
            .values()
            .find(|u| u.user_name.trim().to_lowercase() == wanted);

        // One failure message for unknown user and wrong password alike.
        match user {
            Some(u) if u.password_hash == hash => Ok(UserDto {
                user_id: u.id,
                user_name: u.user_name.clone(),
                role: u.role.clone(),
            }),
            _ => Err(ServiceError::Invalid("Login failed".into())),
        }
    }

    async fn seed_users(
        &self,
        count_usr: usize,
        count_sup_usr: usize,
    ) -> ServiceResult<UsersInfo> {
        let mut tables = self.inner.write().await;
        tables.users.retain(|_, u| !u.seeded);

        let salt = self.config.password_salt();
        // Seeded demo accounts use the user name as password.
        for i in 1..=count_usr {
            insert_seeded_user(&mut tables, salt, format!("usr{}", i), "usr");
        }
        for i in 1..=count_sup_usr {
            insert_seeded_user(&mut tables, salt, format!("supusr{}", i), "supusr");
        }

        Ok(UsersInfo {
            nr_seeded_users: count_usr,
            nr_seeded_super_users: count_sup_usr,
        })
    }
}

fn insert_seeded_user(
    tables: &mut Tables,
    salt: &crate::config::PasswordSaltDetails,
    name: String,
    role: &str,
) {
    let id = Uuid::new_v4();
    tables.users.insert(
        id,
        UserRow {
            id,
            seeded: true,
            password_hash: auth::hash_password(salt, &name),
            user_name: name,
            role: role.to_string(),
        },
    );
}

const FIRST_NAMES: &[&str] = &[
    "Anna", "Bert", "Cecilia", "David", "Elin", "Fredrik", "Greta", "Hans", "Ingrid", "Johan",
    "Karin", "Lars", "Maria", "Nils", "Olivia", "Per", "Rut", "Sven", "Tove", "Ulf",
];

const LAST_NAMES: &[&str] = &[
    "Andersson", "Berg", "Carlsson", "Dahl", "Ek", "Forsberg", "Gustafsson", "Holm", "Isaksson",
    "Johansson", "Karlsson", "Lind", "Magnusson", "Nilsson", "Olsson", "Persson",
];

const PET_NAMES: &[&str] = &[
    "Rex", "Bella", "Charlie", "Luna", "Max", "Molly", "Buddy", "Daisy", "Rocky", "Lucy",
];

const PET_KINDS: &[PetKind] = &[
    PetKind::Dog,
    PetKind::Cat,
    PetKind::Fish,
    PetKind::Bird,
    PetKind::Rabbit,
];

const PET_MOODS: &[PetMood] = &[
    PetMood::Happy,
    PetMood::Sad,
    PetMood::Grumpy,
    PetMood::Sleepy,
    PetMood::Playful,
];

const QUOTES: &[(&str, &str)] = &[
    ("Be yourself; everyone else is already taken.", "Oscar Wilde"),
    ("So many books, so little time.", "Frank Zappa"),
    ("A room without books is like a body without a soul.", "Marcus Tullius Cicero"),
    ("You only live once, but if you do it right, once is enough.", "Mae West"),
    ("If you tell the truth, you don't have to remember anything.", "Mark Twain"),
    ("Without music, life would be a mistake.", "Friedrich Nietzsche"),
];

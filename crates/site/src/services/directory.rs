//! Joined user-and-media view for the administration panel.
//!
//! The panel works on an in-memory association of media records to their
//! owning users, rebuilt from fresh fetches on every page load. Mutations
//! reconcile this view after the backend confirms them, without a second
//! fetch.

use pokedex_core::{MediaId, UserId};

use crate::supabase::{MediaRecord, UserRecord};

/// One user together with the media records they own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithMedia {
    pub user: UserRecord,
    pub media: Vec<MediaRecord>,
}

/// In-memory joined view over the `usuario` and `multimedia` collections.
///
/// Invariants:
/// - every media record appears in `media` (the flat collection);
/// - a media record appears under exactly one user's list when its owner id
///   matches a user, otherwise in `unowned`;
/// - the view reflects the collections as last fetched plus any confirmed
///   mutations applied through [`Self::apply_user_edit`] /
///   [`Self::remove_media`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    pub users: Vec<UserWithMedia>,
    pub media: Vec<MediaRecord>,
    pub unowned: Vec<MediaRecord>,
}

impl Directory {
    /// Build the joined view from freshly fetched collections.
    ///
    /// Input order is preserved for stable rendering.
    #[must_use]
    pub fn build(users: Vec<UserRecord>, media: Vec<MediaRecord>) -> Self {
        let users: Vec<UserWithMedia> = users
            .into_iter()
            .map(|user| {
                let owned = media
                    .iter()
                    .filter(|m| m.owner_id == user.id)
                    .cloned()
                    .collect();
                UserWithMedia { user, media: owned }
            })
            .collect();

        let unowned = media
            .iter()
            .filter(|m| !users.iter().any(|u| u.user.id == m.owner_id))
            .cloned()
            .collect();

        Self {
            users,
            media,
            unowned,
        }
    }

    /// Remove a media record everywhere it appears.
    ///
    /// Removing an id that is already absent is a no-op.
    pub fn remove_media(&mut self, id: MediaId) {
        self.media.retain(|m| m.id != id);
        self.unowned.retain(|m| m.id != id);
        for entry in &mut self.users {
            entry.media.retain(|m| m.id != id);
        }
    }

    /// Patch a user's editable fields to exactly the given values.
    ///
    /// Returns `false` when no user with that id is present.
    pub fn apply_user_edit(
        &mut self,
        id: UserId,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> bool {
        match self.users.iter_mut().find(|u| u.user.id == id) {
            Some(entry) => {
                entry.user.name = name.to_string();
                entry.user.email = email.to_string();
                entry.user.phone = phone.map(ToString::to_string);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pokedex_core::Role;
    use uuid::Uuid;

    use super::*;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            id: UserId::new(Uuid::new_v4()),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::user(),
            phone: Some("555-0100".to_string()),
        }
    }

    fn media(id: i64, owner: UserId) -> MediaRecord {
        MediaRecord {
            id: MediaId::new(id),
            url: format!("https://cdn.example.com/{id}.png"),
            owner_id: owner,
        }
    }

    #[test]
    fn test_join_associates_media_by_owner_id() {
        let ash = user("ash");
        let misty = user("misty");
        let rows = vec![media(1, ash.id), media(2, misty.id), media(3, ash.id)];

        let dir = Directory::build(vec![ash.clone(), misty.clone()], rows);

        let ash_entry = dir.users.iter().find(|u| u.user.id == ash.id).unwrap();
        let misty_entry = dir.users.iter().find(|u| u.user.id == misty.id).unwrap();
        assert_eq!(
            ash_entry.media.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![MediaId::new(1), MediaId::new(3)]
        );
        assert_eq!(misty_entry.media.len(), 1);
    }

    #[test]
    fn test_join_user_without_media_gets_empty_list() {
        let ash = user("ash");
        let brock = user("brock");
        let rows = vec![media(1, ash.id)];

        let dir = Directory::build(vec![ash, brock.clone()], rows);

        let brock_entry = dir.users.iter().find(|u| u.user.id == brock.id).unwrap();
        assert!(brock_entry.media.is_empty());
    }

    #[test]
    fn test_join_is_total_over_media() {
        // Every media record appears under exactly one user or in the
        // unowned bucket; none is lost from the flat collection.
        let ash = user("ash");
        let orphan_owner = UserId::new(Uuid::new_v4());
        let rows = vec![media(1, ash.id), media(2, orphan_owner)];

        let dir = Directory::build(vec![ash.clone()], rows);

        assert_eq!(dir.media.len(), 2);
        let listed: usize = dir.users.iter().map(|u| u.media.len()).sum();
        assert_eq!(listed + dir.unowned.len(), 2);
    }

    #[test]
    fn test_orphaned_media_surfaces_in_unowned_bucket() {
        // An owner id matching no fetched user keeps the record in the flat
        // collection and surfaces it as unowned instead of dropping it.
        let ash = user("ash");
        let orphan = media(9, UserId::new(Uuid::new_v4()));

        let dir = Directory::build(vec![ash.clone()], vec![orphan.clone()]);

        assert!(dir.users.iter().all(|u| u.media.is_empty()));
        assert_eq!(dir.unowned, vec![orphan.clone()]);
        assert_eq!(dir.media, vec![orphan]);
    }

    #[test]
    fn test_remove_media_removes_from_flat_and_per_user_lists() {
        let ash = user("ash");
        let rows = vec![media(1, ash.id), media(2, ash.id)];
        let mut dir = Directory::build(vec![ash.clone()], rows);

        dir.remove_media(MediaId::new(1));

        assert_eq!(dir.media.len(), 1);
        let ash_entry = dir.users.iter().find(|u| u.user.id == ash.id).unwrap();
        assert_eq!(ash_entry.media.len(), 1);
        assert_eq!(ash_entry.media.first().unwrap().id, MediaId::new(2));
    }

    #[test]
    fn test_remove_media_removes_from_unowned_bucket() {
        let orphan = media(5, UserId::new(Uuid::new_v4()));
        let mut dir = Directory::build(vec![], vec![orphan]);

        dir.remove_media(MediaId::new(5));

        assert!(dir.media.is_empty());
        assert!(dir.unowned.is_empty());
    }

    #[test]
    fn test_remove_media_is_idempotent() {
        let ash = user("ash");
        let mut dir = Directory::build(vec![ash], vec![]);
        let before = dir.clone();

        // Deleting an already-absent id is a no-op, not an error.
        dir.remove_media(MediaId::new(42));
        dir.remove_media(MediaId::new(42));

        assert_eq!(dir, before);
    }

    #[test]
    fn test_apply_user_edit_patches_exact_fields() {
        let ash = user("ash");
        let id = ash.id;
        let mut dir = Directory::build(vec![ash], vec![]);

        let patched = dir.apply_user_edit(id, "Ash Ketchum", "ash@paleta.example", Some("555-0123"));

        assert!(patched);
        let entry = dir.users.iter().find(|u| u.user.id == id).unwrap();
        assert_eq!(entry.user.name, "Ash Ketchum");
        assert_eq!(entry.user.email, "ash@paleta.example");
        assert_eq!(entry.user.phone.as_deref(), Some("555-0123"));
    }

    #[test]
    fn test_apply_user_edit_clears_phone_when_absent() {
        let ash = user("ash");
        let id = ash.id;
        let mut dir = Directory::build(vec![ash], vec![]);

        assert!(dir.apply_user_edit(id, "Ash", "ash@example.com", None));
        assert_eq!(dir.users.first().unwrap().user.phone, None);
    }

    #[test]
    fn test_apply_user_edit_unknown_user_is_rejected() {
        let mut dir = Directory::build(vec![user("ash")], vec![]);
        let before = dir.clone();

        let patched = dir.apply_user_edit(
            UserId::new(Uuid::new_v4()),
            "nobody",
            "nobody@example.com",
            None,
        );

        assert!(!patched);
        assert_eq!(dir, before);
    }

    #[test]
    fn test_apply_user_edit_does_not_touch_role() {
        let mut admin = user("oak");
        admin.role = Role::admin();
        let id = admin.id;
        let mut dir = Directory::build(vec![admin], vec![]);

        assert!(dir.apply_user_edit(id, "Profesor Oak", "oak@example.com", None));
        assert!(dir.users.first().unwrap().user.role.is_admin());
    }
}

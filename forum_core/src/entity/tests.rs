#[cfg(test)]
mod entity_tests {
    use crate::entity::prelude::*;
    use crate::ids::*;
    use crate::models::path::PostPath;
    use crate::test_utils::{seed_forum, seed_news, seed_user, setup_test_db};

    fn post_row(thread: &ThreadModel, path: Vec<i64>) -> PostActiveModel {
        let path = PostPath::from(path);
        PostActiveModel {
            id: Set(path.leaf_id().unwrap_or(PostId::new(0))),
            parent: Set(path.ids().iter().rev().nth(1).copied().unwrap_or(0)),
            author: Set(thread.author.clone()),
            message: Set("body".to_string()),
            is_edited: Set(false),
            forum: Set(thread.forum.clone()),
            thread: Set(thread.id),
            created: Set("2024-01-01T00:00:00.000Z".to_string()),
            root: Set(path.ids()[0]),
            path: Set(path),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;

        let user = UserActiveModel {
            nickname: Set("jack".to_string()),
            fullname: Set("Jack Sparrow".to_string()),
            about: Set("Captain".to_string()),
            email: Set("jack@sea.org".to_string()),
        };
        User::insert(user).exec(&db).await.expect("Failed to insert user");

        let found = User::find_by_id("jack")
            .one(&db)
            .await
            .expect("Failed to query user")
            .expect("user should exist");

        assert_eq!(found.fullname, "Jack Sparrow");
        assert_eq!(found.email, "jack@sea.org");
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let db = setup_test_db().await;
        seed_user(&db, "alice").await;

        let clash = UserActiveModel {
            nickname: Set("alice2".to_string()),
            fullname: Set(String::new()),
            about: Set(String::new()),
            email: Set("alice@example.org".to_string()),
        };
        let err = User::insert(clash).exec(&db).await.unwrap_err();

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_forum_requires_existing_owner() {
        let db = setup_test_db().await;

        let forum = ForumActiveModel {
            slug: Set("news".to_string()),
            title: Set("News".to_string()),
            user: Set("ghost".to_string()),
            posts: Set(0),
            threads: Set(0),
        };
        let err = Forum::insert(forum).exec(&db).await.unwrap_err();

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::ForeignKeyConstraintViolation(_))
        ));
        assert_eq!(Forum::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_thread_ids_are_assigned_in_order() {
        let db = setup_test_db().await;
        seed_user(&db, "alice").await;
        seed_forum(&db, "news", "alice").await;

        let mut ids = Vec::new();
        for title in ["one", "two", "three"] {
            let thread = ThreadActiveModel {
                title: Set(title.to_string()),
                author: Set("alice".to_string()),
                forum: Set("news".to_string()),
                message: Set("m".to_string()),
                votes: Set(0),
                created: Set("2024-01-01T00:00:00.000Z".to_string()),
                ..Default::default()
            };
            ids.push(Thread::insert(thread).exec(&db).await.unwrap().last_insert_id);
        }

        assert_eq!(ids, [ThreadId::new(1), ThreadId::new(2), ThreadId::new(3)]);
    }

    #[tokio::test]
    async fn test_path_text_orders_like_integer_sequences() {
        let db = setup_test_db().await;
        let (_, thread) = seed_news(&db).await;

        for path in [vec![2, 10], vec![2], vec![12], vec![2, 9], vec![2, 9, 11]] {
            Post::insert(post_row(&thread, path)).exec(&db).await.unwrap();
        }

        let ordered: Vec<Vec<i64>> = Post::find()
            .order_by_asc(PostColumn::Path)
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.path.ids().to_vec())
            .collect();

        assert_eq!(
            ordered,
            [vec![2], vec![2, 9], vec![2, 9, 11], vec![2, 10], vec![12]]
        );
    }

    #[tokio::test]
    async fn test_one_vote_per_user_and_thread() {
        let db = setup_test_db().await;
        let (_, thread) = seed_news(&db).await;

        let vote = |voice| VoteActiveModel {
            thread_id: Set(thread.id),
            nickname: Set("alice".to_string()),
            voice: Set(voice),
        };
        Vote::insert(vote(1)).exec(&db).await.unwrap();
        assert!(Vote::insert(vote(-1)).exec(&db).await.is_err());

        let stored = Vote::find_by_id((thread.id, "alice".to_string()))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.voice, 1);
    }

    #[tokio::test]
    async fn test_find_forum_members_through_relation() {
        let db = setup_test_db().await;
        let (forum, _) = seed_news(&db).await;
        seed_user(&db, "bob").await;

        for nickname in ["alice", "bob"] {
            let member = ForumUserActiveModel {
                forum: Set(forum.slug.clone()),
                nickname: Set(nickname.to_string()),
            };
            ForumUser::insert(member).exec(&db).await.unwrap();
        }

        let members = User::find()
            .inner_join(ForumUser)
            .filter(ForumUserColumn::Forum.eq("news"))
            .order_by_asc(UserColumn::Nickname)
            .all(&db)
            .await
            .unwrap();
        let nicknames: Vec<_> = members.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(nicknames, ["alice", "bob"]);

        let owner = forum.find_related(User).one(&db).await.unwrap().unwrap();
        assert_eq!(owner.nickname, "alice");
    }
}

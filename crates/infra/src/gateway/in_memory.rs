//! In-process emulation of the procedure catalogue.
//!
//! Intended for tests/dev. It reproduces the observable contract of each
//! procedure (result-set shape, not-found marker rows, uniqueness and foreign
//! key failures, delete cascades) without a database server.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use twitacad_core::{Like, NOT_FOUND_MARKER, Seguidor, Tweet, TweetId, Usuario, UsuarioId};

use super::procedure::Procedure;
use super::r#trait::{GatewayError, ProcParam, ProcedureGateway, ResultSet, Row, check_arity};

#[derive(Debug, Default)]
struct Tables {
    usuarios: BTreeMap<UsuarioId, Usuario>,
    tweets: BTreeMap<TweetId, Tweet>,
    seguidores: Vec<Seguidor>,
    likes: Vec<Like>,
    next_usuario: i64,
    next_tweet: i64,
}

impl Tables {
    fn allocate_usuario(&mut self) -> UsuarioId {
        self.next_usuario += 1;
        UsuarioId::new(self.next_usuario)
    }

    fn allocate_tweet(&mut self) -> TweetId {
        self.next_tweet += 1;
        TweetId::new(self.next_tweet)
    }

    fn like_count(&self, tweet: TweetId) -> i64 {
        self.likes.iter().filter(|l| l.tweet == tweet).count() as i64
    }
}

/// In-memory procedure gateway.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    tables: RwLock<Tables>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProcedureGateway for InMemoryGateway {
    #[instrument(skip(self, params), fields(procedure = procedure.name()))]
    async fn call(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<ResultSet, GatewayError> {
        check_arity(procedure, &params)?;
        let args = Args { procedure, params: &params };

        match procedure {
            Procedure::R_Usuario
            | Procedure::R_UsuarioByID
            | Procedure::R_Tweet
            | Procedure::R_TweetsPerfil
            | Procedure::R_TweetFollowing
            | Procedure::S_InTweet
            | Procedure::R_Seguidor
            | Procedure::R_IsFollowing
            | Procedure::R_Seguidores
            | Procedure::R_Siguiendo
            | Procedure::R_IsLiked
            | Procedure::R_CantidadLikes
            | Procedure::R_Login => {
                let tables = self.tables.read().map_err(|_| poisoned(procedure))?;
                read(&tables, args)
            }
            Procedure::CU_Usuario
            | Procedure::D_Usuario
            | Procedure::CU_Tweet
            | Procedure::D_Tweet
            | Procedure::C_Seguidor
            | Procedure::D_Unfollow
            | Procedure::C_Likes
            | Procedure::D_Likes => {
                let mut tables = self.tables.write().map_err(|_| poisoned(procedure))?;
                write(&mut tables, args)
            }
        }
    }
}

fn read(t: &Tables, args: Args<'_>) -> Result<ResultSet, GatewayError> {
    let p = args.procedure;
    match p {
        Procedure::R_Usuario => t.usuarios.values().map(|u| to_row(p, u)).collect(),

        Procedure::R_UsuarioByID => {
            let id = args.usuario(0)?;
            match t.usuarios.get(&id) {
                Some(u) => Ok(vec![to_row(p, u)?]),
                None => Ok(vec![marker("Usuario no encontrado")]),
            }
        }

        Procedure::R_Tweet => t.tweets.values().map(|tw| to_row(p, tw)).collect(),

        Procedure::R_TweetsPerfil => {
            let autor = args.usuario(0)?;
            t.tweets
                .values()
                .filter(|tw| tw.autor == autor)
                .map(|tw| to_row(p, tw))
                .collect()
        }

        Procedure::R_TweetFollowing => {
            let id = args.usuario(0)?;
            let followed: Vec<UsuarioId> = t
                .seguidores
                .iter()
                .filter(|e| e.seguidor == id)
                .map(|e| e.usuario)
                .collect();
            t.tweets
                .values()
                .filter(|tw| tw.autor == id || followed.contains(&tw.autor))
                .map(|tw| to_row(p, tw))
                .collect()
        }

        Procedure::S_InTweet => {
            let keyword = args.text(0)?.to_lowercase();
            t.tweets
                .values()
                .filter(|tw| tw.cuerpo.to_lowercase().contains(&keyword))
                .map(|tw| to_row(p, tw))
                .collect()
        }

        Procedure::R_Seguidor => t.seguidores.iter().map(|e| to_row(p, e)).collect(),

        Procedure::R_IsFollowing => {
            let edge = Seguidor::new(args.usuario(0)?, args.usuario(1)?);
            let exists = t.seguidores.contains(&edge);
            Ok(vec![object(json!({ "IsFollowing": i64::from(exists) }))])
        }

        Procedure::R_Seguidores => {
            let id = args.usuario(0)?;
            let followers = t.seguidores.iter().filter(|e| e.usuario == id).map(|e| e.seguidor);
            Ok(followers.filter_map(|uid| t.usuarios.get(&uid)).map(profile).collect())
        }

        Procedure::R_Siguiendo => {
            let id = args.usuario(0)?;
            let followed = t.seguidores.iter().filter(|e| e.seguidor == id).map(|e| e.usuario);
            Ok(followed.filter_map(|uid| t.usuarios.get(&uid)).map(profile).collect())
        }

        Procedure::R_IsLiked => {
            let like = Like::new(args.tweet(0)?, args.usuario(1)?);
            let exists = t.likes.contains(&like);
            Ok(vec![object(json!({ "IsLiked": i64::from(exists) }))])
        }

        Procedure::R_CantidadLikes => {
            let tweet = args.tweet(0)?;
            Ok(vec![object(json!({ "idTweet": tweet, "Likes": t.like_count(tweet) }))])
        }

        Procedure::R_Login => {
            let nombre_usuario = args.text(0)?;
            let contrasena = args.text(1)?;
            let found = t
                .usuarios
                .values()
                .find(|u| u.nombre_usuario == nombre_usuario && u.contrasena == contrasena);
            match found {
                Some(u) => Ok(vec![to_row(p, u)?]),
                None => Ok(vec![marker("Usuario o contraseña incorrectos")]),
            }
        }

        _ => Err(GatewayError::database(p, "not a read procedure")),
    }
}

fn write(t: &mut Tables, args: Args<'_>) -> Result<ResultSet, GatewayError> {
    let p = args.procedure;
    match p {
        Procedure::CU_Usuario => {
            let id = args.usuario(0)?;
            let nombre = args.required_text(1, "Nombre")?;
            let nombre_usuario = args.required_text(2, "NombreUsuario")?;
            let contrasena = args.required_text(3, "Contraseña")?;

            let taken = t
                .usuarios
                .values()
                .any(|u| u.nombre_usuario == nombre_usuario && u.id != id);
            if taken {
                return Err(GatewayError::database(
                    p,
                    format!("Duplicate entry '{nombre_usuario}' for key 'NombreUsuario'"),
                ));
            }

            if id.is_new() {
                let id = t.allocate_usuario();
                let usuario = Usuario::new(id, nombre, nombre_usuario, contrasena);
                let row = to_row(p, &usuario)?;
                t.usuarios.insert(id, usuario);
                return Ok(vec![row]);
            }

            match t.usuarios.get_mut(&id) {
                Some(u) => {
                    u.nombre = nombre.to_string();
                    u.nombre_usuario = nombre_usuario.to_string();
                    u.contrasena = contrasena.to_string();
                    Ok(vec![to_row(p, u)?])
                }
                None => Ok(vec![]),
            }
        }

        Procedure::D_Usuario => {
            let id = args.usuario(0)?;
            if t.usuarios.remove(&id).is_some() {
                let authored: Vec<TweetId> = t.tweets.values().filter(|tw| tw.autor == id).map(|tw| tw.id).collect();
                t.tweets.retain(|_, tw| tw.autor != id);
                t.likes.retain(|l| l.usuario != id && !authored.contains(&l.tweet));
                t.seguidores.retain(|e| e.usuario != id && e.seguidor != id);
                recount_likes(t);
            }
            Ok(vec![])
        }

        Procedure::CU_Tweet => {
            let id = args.tweet(0)?;
            let cuerpo = args.required_text(1, "Cuerpo")?;
            let fecha = args.required_text(2, "FechaHoraPublicacion")?;
            let autor = args.usuario(3)?;
            if !t.usuarios.contains_key(&autor) {
                return Err(foreign_key(p, "Tweet", "idUsuario"));
            }

            if id.is_new() {
                let id = t.allocate_tweet();
                let tweet = Tweet::new(id, cuerpo, fecha, autor);
                let row = to_row(p, &tweet)?;
                t.tweets.insert(id, tweet);
                return Ok(vec![row]);
            }

            match t.tweets.get_mut(&id) {
                Some(tw) => {
                    tw.cuerpo = cuerpo.to_string();
                    tw.fecha_hora_publicacion = fecha.to_string();
                    tw.autor = autor;
                    Ok(vec![to_row(p, tw)?])
                }
                None => Ok(vec![]),
            }
        }

        Procedure::D_Tweet => {
            let id = args.tweet(0)?;
            let removed = i64::from(t.tweets.remove(&id).is_some());
            t.likes.retain(|l| l.tweet != id);
            Ok(vec![object(json!({ "idTweet": id, "FilasAfectadas": removed }))])
        }

        Procedure::C_Seguidor => {
            let edge = Seguidor::new(args.usuario(0)?, args.usuario(1)?);
            if !t.usuarios.contains_key(&edge.usuario) || !t.usuarios.contains_key(&edge.seguidor) {
                return Err(foreign_key(p, "Seguidor", "idUsuario"));
            }
            if t.seguidores.contains(&edge) {
                return Err(GatewayError::database(
                    p,
                    format!("Duplicate entry '{}-{}' for key 'PRIMARY'", edge.usuario, edge.seguidor),
                ));
            }
            t.seguidores.push(edge);
            Ok(vec![to_row(p, &edge)?])
        }

        Procedure::D_Unfollow => {
            let edge = Seguidor::new(args.usuario(0)?, args.usuario(1)?);
            t.seguidores.retain(|e| *e != edge);
            Ok(vec![])
        }

        Procedure::C_Likes => {
            let like = Like::new(args.tweet(0)?, args.usuario(1)?);
            if !t.tweets.contains_key(&like.tweet) || !t.usuarios.contains_key(&like.usuario) {
                return Err(foreign_key(p, "Likes", "idTweet"));
            }
            if t.likes.contains(&like) {
                return Err(GatewayError::database(
                    p,
                    format!("Duplicate entry '{}-{}' for key 'PRIMARY'", like.tweet, like.usuario),
                ));
            }
            t.likes.push(like);
            recount_likes(t);
            Ok(vec![object(json!({ "idTweet": like.tweet, "Likes": t.like_count(like.tweet) }))])
        }

        Procedure::D_Likes => {
            let like = Like::new(args.tweet(0)?, args.usuario(1)?);
            t.likes.retain(|l| *l != like);
            recount_likes(t);
            Ok(vec![object(json!({ "idTweet": like.tweet, "Likes": t.like_count(like.tweet) }))])
        }

        _ => Err(GatewayError::database(p, "not a write procedure")),
    }
}

/// Keeps the denormalised `Likes` column in step with the like edges.
fn recount_likes(t: &mut Tables) {
    let counts: Vec<(TweetId, i64)> = t.tweets.keys().map(|id| (*id, t.like_count(*id))).collect();
    for (id, count) in counts {
        if let Some(tw) = t.tweets.get_mut(&id) {
            tw.likes = count;
        }
    }
}

#[derive(Clone, Copy)]
struct Args<'a> {
    procedure: Procedure,
    params: &'a [ProcParam],
}

impl<'a> Args<'a> {
    fn int(&self, index: usize) -> Result<i64, GatewayError> {
        match &self.params[index] {
            ProcParam::Int(v) => Ok(*v),
            ProcParam::Text(s) => s.trim().parse().map_err(|_| self.invalid(index, "expected an integer")),
            ProcParam::Null => Err(self.invalid(index, "expected an integer, got NULL")),
        }
    }

    fn usuario(&self, index: usize) -> Result<UsuarioId, GatewayError> {
        self.int(index).map(UsuarioId::new)
    }

    fn tweet(&self, index: usize) -> Result<TweetId, GatewayError> {
        self.int(index).map(TweetId::new)
    }

    fn text(&self, index: usize) -> Result<&'a str, GatewayError> {
        match &self.params[index] {
            ProcParam::Text(s) => Ok(s.as_str()),
            _ => Err(self.invalid(index, "expected text")),
        }
    }

    /// Text destined for a NOT NULL column.
    fn required_text(&self, index: usize, column: &str) -> Result<&'a str, GatewayError> {
        match &self.params[index] {
            ProcParam::Null => Err(GatewayError::database(
                self.procedure,
                format!("Column '{column}' cannot be null"),
            )),
            _ => self.text(index),
        }
    }

    fn invalid(&self, index: usize, message: &str) -> GatewayError {
        GatewayError::Param {
            procedure: self.procedure.name(),
            index,
            message: message.to_string(),
        }
    }
}

fn to_row<T: Serialize>(procedure: Procedure, value: &T) -> Result<Row, GatewayError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GatewayError::Decode {
            procedure: procedure.name(),
            message: format!("expected an object row, got {other}"),
        }),
        Err(e) => Err(GatewayError::Decode {
            procedure: procedure.name(),
            message: e.to_string(),
        }),
    }
}

/// Public profile columns, as the follower listings return them.
fn profile(u: &Usuario) -> Row {
    object(json!({
        "idUsuario": u.id,
        "Nombre": u.nombre,
        "NombreUsuario": u.nombre_usuario,
    }))
}

fn marker(message: &str) -> Row {
    let mut row = Row::new();
    row.insert(NOT_FOUND_MARKER.to_string(), Value::from(message));
    row
}

fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn foreign_key(procedure: Procedure, table: &str, column: &str) -> GatewayError {
    GatewayError::database(
        procedure,
        format!("Cannot add or update a child row: a foreign key constraint fails ({table}.{column})"),
    )
}

fn poisoned(procedure: Procedure) -> GatewayError {
    GatewayError::Connection {
        operation: procedure.name(),
        message: "in-memory tables lock poisoned".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Lookup;

    async fn create_user(g: &InMemoryGateway, handle: &str) -> i64 {
        let rows = g
            .call(
                Procedure::CU_Usuario,
                vec![0i64.into(), "Nombre".into(), handle.into(), "pw".into()],
            )
            .await
            .unwrap();
        rows[0]["idUsuario"].as_i64().unwrap()
    }

    async fn create_tweet(g: &InMemoryGateway, autor: i64, cuerpo: &str) -> i64 {
        let rows = g
            .call(
                Procedure::CU_Tweet,
                vec![0i64.into(), cuerpo.into(), "2024-05-01 10:00:00".into(), autor.into()],
            )
            .await
            .unwrap();
        rows[0]["idTweet"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn user_lookup_reports_marker_when_absent() {
        let g = InMemoryGateway::new();
        let id = create_user(&g, "ana").await;

        let found = g.lookup(Procedure::R_UsuarioByID, vec![id.into()]).await.unwrap();
        let Lookup::Found(row) = found else {
            panic!("expected user to be found");
        };
        assert_eq!(row["NombreUsuario"], "ana");

        let missing = g.lookup(Procedure::R_UsuarioByID, vec![999i64.into()]).await.unwrap();
        let Lookup::NotFound(rows) = missing else {
            panic!("expected marker");
        };
        assert!(rows[0].contains_key(NOT_FOUND_MARKER));
    }

    #[tokio::test]
    async fn update_with_explicit_id_keeps_the_id() {
        let g = InMemoryGateway::new();
        let id = create_user(&g, "ana").await;

        let rows = g
            .call(
                Procedure::CU_Usuario,
                vec![id.into(), "Ana Maria".into(), "ana".into(), "new".into()],
            )
            .await
            .unwrap();
        assert_eq!(rows[0]["idUsuario"], id);
        assert_eq!(rows[0]["Nombre"], "Ana Maria");
        assert_eq!(g.call(Procedure::R_Usuario, vec![]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_handle_is_a_database_error() {
        let g = InMemoryGateway::new();
        create_user(&g, "ana").await;

        let err = g
            .call(
                Procedure::CU_Usuario,
                vec![0i64.into(), "Otra".into(), "ana".into(), "pw".into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Database { procedure: "CU_Usuario", .. }));
    }

    #[tokio::test]
    async fn null_required_column_is_rejected() {
        let g = InMemoryGateway::new();
        let err = g
            .call(
                Procedure::CU_Usuario,
                vec![0i64.into(), "Ana".into(), ProcParam::Null, "pw".into()],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("NombreUsuario"));
    }

    #[tokio::test]
    async fn timeline_includes_self_and_followed_only() {
        let g = InMemoryGateway::new();
        let a = create_user(&g, "a").await;
        let b = create_user(&g, "b").await;
        let c = create_user(&g, "c").await;
        create_tweet(&g, a, "from a").await;
        create_tweet(&g, b, "from b").await;
        create_tweet(&g, c, "from c").await;

        // a follows b
        g.call(Procedure::C_Seguidor, vec![b.into(), a.into()]).await.unwrap();

        let rows = g.call(Procedure::R_TweetFollowing, vec![a.into()]).await.unwrap();
        let bodies: Vec<_> = rows.iter().map(|r| r["Cuerpo"].as_str().unwrap()).collect();
        assert_eq!(bodies, vec!["from a", "from b"]);

        let siguiendo = g.call(Procedure::R_Siguiendo, vec![a.into()]).await.unwrap();
        assert_eq!(siguiendo.len(), 1);
        assert_eq!(siguiendo[0]["idUsuario"], b);
        assert!(!siguiendo[0].contains_key(Usuario::CREDENTIAL_FIELD));

        let seguidores = g.call(Procedure::R_Seguidores, vec![b.into()]).await.unwrap();
        assert_eq!(seguidores[0]["idUsuario"], a);
    }

    #[tokio::test]
    async fn keyword_search_is_case_insensitive() {
        let g = InMemoryGateway::new();
        let a = create_user(&g, "a").await;
        create_tweet(&g, a, "Hola Mundo").await;
        create_tweet(&g, a, "adios").await;

        let rows = g.call(Procedure::S_InTweet, vec!["mundo".into()]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Cuerpo"], "Hola Mundo");
    }

    #[tokio::test]
    async fn likes_keep_the_counter_in_step() {
        let g = InMemoryGateway::new();
        let a = create_user(&g, "a").await;
        let b = create_user(&g, "b").await;
        let tw = create_tweet(&g, a, "hi").await;

        g.call(Procedure::C_Likes, vec![tw.into(), a.into()]).await.unwrap();
        g.call(Procedure::C_Likes, vec![tw.into(), b.into()]).await.unwrap();
        let count = g.call(Procedure::R_CantidadLikes, vec![tw.into()]).await.unwrap();
        assert_eq!(count[0]["Likes"], 2);

        let tweets = g.call(Procedure::R_Tweet, vec![]).await.unwrap();
        assert_eq!(tweets[0]["Likes"], 2);

        g.call(Procedure::D_Likes, vec![tw.into(), a.into()]).await.unwrap();
        let liked = g.call(Procedure::R_IsLiked, vec![tw.into(), a.into()]).await.unwrap();
        assert_eq!(liked[0]["IsLiked"], 0);
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let g = InMemoryGateway::new();
        let a = create_user(&g, "a").await;
        let b = create_user(&g, "b").await;
        let tw = create_tweet(&g, a, "hi").await;
        g.call(Procedure::C_Likes, vec![tw.into(), b.into()]).await.unwrap();
        g.call(Procedure::C_Seguidor, vec![a.into(), b.into()]).await.unwrap();

        g.call(Procedure::D_Usuario, vec![a.into()]).await.unwrap();

        assert!(g.call(Procedure::R_Tweet, vec![]).await.unwrap().is_empty());
        assert!(g.call(Procedure::R_Seguidor, vec![]).await.unwrap().is_empty());
        let liked = g.call(Procedure::R_IsLiked, vec![tw.into(), b.into()]).await.unwrap();
        assert_eq!(liked[0]["IsLiked"], 0);
    }

    #[tokio::test]
    async fn edges_require_existing_rows() {
        let g = InMemoryGateway::new();
        let a = create_user(&g, "a").await;

        let err = g.call(Procedure::C_Seguidor, vec![a.into(), 77i64.into()]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Database { .. }));

        let err = g.call(Procedure::C_Likes, vec![5i64.into(), a.into()]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Database { .. }));
    }

    #[tokio::test]
    async fn login_matches_handle_and_secret() {
        let g = InMemoryGateway::new();
        create_user(&g, "ana").await;

        let ok = g.lookup(Procedure::R_Login, vec!["ana".into(), "pw".into()]).await.unwrap();
        assert!(ok.is_found());

        let bad = g.lookup(Procedure::R_Login, vec!["ana".into(), "nope".into()]).await.unwrap();
        assert!(!bad.is_found());
    }

    #[tokio::test]
    async fn wrong_param_type_is_rejected() {
        let g = InMemoryGateway::new();
        let err = g.call(Procedure::R_UsuarioByID, vec!["x".into()]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Param { index: 0, .. }));
    }
}

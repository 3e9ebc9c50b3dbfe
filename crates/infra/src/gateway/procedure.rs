//! Catalogue of the stored procedures the API is allowed to call.

use core::fmt;

/// A named stored procedure.
///
/// The variant names are the database object names verbatim. Each procedure
/// has a fixed number of positional parameters.
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Procedure {
    R_Usuario,
    R_UsuarioByID,
    CU_Usuario,
    D_Usuario,

    R_Tweet,
    R_TweetsPerfil,
    R_TweetFollowing,
    S_InTweet,
    CU_Tweet,
    D_Tweet,

    R_Seguidor,
    R_IsFollowing,
    R_Seguidores,
    R_Siguiendo,
    C_Seguidor,
    D_Unfollow,

    R_IsLiked,
    R_CantidadLikes,
    C_Likes,
    D_Likes,

    R_Login,
}

impl Procedure {
    pub const ALL: [Procedure; 21] = [
        Procedure::R_Usuario,
        Procedure::R_UsuarioByID,
        Procedure::CU_Usuario,
        Procedure::D_Usuario,
        Procedure::R_Tweet,
        Procedure::R_TweetsPerfil,
        Procedure::R_TweetFollowing,
        Procedure::S_InTweet,
        Procedure::CU_Tweet,
        Procedure::D_Tweet,
        Procedure::R_Seguidor,
        Procedure::R_IsFollowing,
        Procedure::R_Seguidores,
        Procedure::R_Siguiendo,
        Procedure::C_Seguidor,
        Procedure::D_Unfollow,
        Procedure::R_IsLiked,
        Procedure::R_CantidadLikes,
        Procedure::C_Likes,
        Procedure::D_Likes,
        Procedure::R_Login,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Procedure::R_Usuario => "R_Usuario",
            Procedure::R_UsuarioByID => "R_UsuarioByID",
            Procedure::CU_Usuario => "CU_Usuario",
            Procedure::D_Usuario => "D_Usuario",
            Procedure::R_Tweet => "R_Tweet",
            Procedure::R_TweetsPerfil => "R_TweetsPerfil",
            Procedure::R_TweetFollowing => "R_TweetFollowing",
            Procedure::S_InTweet => "S_InTweet",
            Procedure::CU_Tweet => "CU_Tweet",
            Procedure::D_Tweet => "D_Tweet",
            Procedure::R_Seguidor => "R_Seguidor",
            Procedure::R_IsFollowing => "R_IsFollowing",
            Procedure::R_Seguidores => "R_Seguidores",
            Procedure::R_Siguiendo => "R_Siguiendo",
            Procedure::C_Seguidor => "C_Seguidor",
            Procedure::D_Unfollow => "D_Unfollow",
            Procedure::R_IsLiked => "R_IsLiked",
            Procedure::R_CantidadLikes => "R_CantidadLikes",
            Procedure::C_Likes => "C_Likes",
            Procedure::D_Likes => "D_Likes",
            Procedure::R_Login => "R_Login",
        }
    }

    /// Number of positional parameters the procedure takes.
    pub fn arity(self) -> usize {
        match self {
            Procedure::R_Usuario | Procedure::R_Tweet | Procedure::R_Seguidor => 0,

            Procedure::R_UsuarioByID
            | Procedure::D_Usuario
            | Procedure::R_TweetsPerfil
            | Procedure::R_TweetFollowing
            | Procedure::S_InTweet
            | Procedure::D_Tweet
            | Procedure::R_Seguidores
            | Procedure::R_Siguiendo
            | Procedure::R_CantidadLikes => 1,

            Procedure::R_IsFollowing
            | Procedure::C_Seguidor
            | Procedure::D_Unfollow
            | Procedure::R_IsLiked
            | Procedure::C_Likes
            | Procedure::D_Likes
            | Procedure::R_Login => 2,

            Procedure::CU_Usuario | Procedure::CU_Tweet => 4,
        }
    }

    /// `CALL name(?, ?, ...)` with one placeholder per parameter.
    pub fn call_sql(self) -> String {
        let placeholders = vec!["?"; self.arity()].join(", ");
        format!("CALL {}({})", self.name(), placeholders)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_sql_has_one_placeholder_per_param() {
        assert_eq!(Procedure::R_Usuario.call_sql(), "CALL R_Usuario()");
        assert_eq!(Procedure::R_IsLiked.call_sql(), "CALL R_IsLiked(?, ?)");
        assert_eq!(Procedure::CU_Tweet.call_sql(), "CALL CU_Tweet(?, ?, ?, ?)");
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Procedure::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Procedure::ALL.len());
    }
}

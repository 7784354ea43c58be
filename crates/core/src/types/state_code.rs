//! Brazilian federative unit codes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the [`StateCode`] abbreviations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown state code: {0}")]
pub struct UnknownStateCode(pub String);

macro_rules! state_codes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// State code of a customer address (one of the 27 Brazilian federative units).
        ///
        /// Stored and transmitted as the two-letter uppercase abbreviation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum StateCode {
            $(
                #[doc = $name]
                $variant,
            )+
        }

        impl StateCode {
            /// Every state code, in alphabetical order of abbreviation.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Two-letter abbreviation (e.g. `SP`).
            #[must_use]
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }

            /// Full name of the federative unit.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for StateCode {
            type Err = UnknownStateCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let code = s.trim().to_ascii_uppercase();
                match code.as_str() {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(UnknownStateCode(s.to_owned())),
                }
            }
        }
    };
}

state_codes! {
    AC => "Acre",
    AL => "Alagoas",
    AM => "Amazonas",
    AP => "Amapá",
    BA => "Bahia",
    CE => "Ceará",
    DF => "Distrito Federal",
    ES => "Espírito Santo",
    GO => "Goiás",
    MA => "Maranhão",
    MG => "Minas Gerais",
    MS => "Mato Grosso do Sul",
    MT => "Mato Grosso",
    PA => "Pará",
    PB => "Paraíba",
    PE => "Pernambuco",
    PI => "Piauí",
    PR => "Paraná",
    RJ => "Rio de Janeiro",
    RN => "Rio Grande do Norte",
    RO => "Rondônia",
    RR => "Roraima",
    RS => "Rio Grande do Sul",
    SC => "Santa Catarina",
    SE => "Sergipe",
    SP => "São Paulo",
    TO => "Tocantins",
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for StateCode {
    type Error = UnknownStateCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StateCode> for &'static str {
    fn from(state: StateCode) -> Self {
        state.code()
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for StateCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StateCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for StateCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

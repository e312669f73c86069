//! Module de résolution de l'angle d'arrivée
//!
//! Convertit un décalage en échantillons en angle par rapport à la
//! perpendiculaire de l'axe des deux microphones (modèle champ lointain).
//!
//! Limite géométrique inhérente: un alignement de deux microphones ne
//! distingue pas une source devant d'une source derrière (ambiguïté
//! avant/arrière). L'angle retourné vaut pour les deux hémisphères; aucun
//! hémisphère n'est présumé ici.

mod resolver;

pub use resolver::{resolve, ArrayGeometry, DoaError, DoaEstimate};

//! Prompt templates for the four analysis operations.

use crate::validate::Language;

pub const SUMMARY_SYSTEM: &str = "Tu es un assistant de résumé vidéo YouTube multilingue.";
pub const KEY_MOMENTS_SYSTEM: &str =
    "Tu es un expert en analyse vidéo qui identifie les moments clés.";
pub const ENHANCE_SYSTEM: &str =
    "Tu es un expert en rédaction qui améliore la qualité des transcriptions.";
pub const COMMENTS_SYSTEM: &str =
    "Tu es un expert en analyse de contenu social qui comprend les dynamiques des commentaires YouTube.";

pub fn summary_prompt(transcript: &str, lang: Language) -> String {
    format!(
        "Tu es un assistant intelligent. Résume le contenu suivant, qui est une transcription \
brute d'une vidéo YouTube.

Ta mission :
- Résume uniquement en {lang}
- Formate en **bullet points clairs** avec des titres en gras
- Pas d'introduction, pas de conclusion
- Garde uniquement les informations utiles
- Utilise **le style Markdown**

Voici la transcription :
{transcript}",
        lang = lang.display_name(),
        transcript = transcript,
    )
}

pub fn key_moments_prompt(transcript: &str, lang: Language) -> String {
    format!(
        "Analyse cette transcription de vidéo YouTube et identifie les moments clés importants.

Instructions spécifiques :
1. Identifie 5-8 moments clés de la vidéo
2. Pour chaque moment :
   - Donne un titre descriptif concis en {lang}
   - Explique brièvement pourquoi ce moment est important
3. Formate la sortie en JSON avec la structure suivante :
   {{
     \"keyMoments\": [
       {{
         \"title\": \"Titre du moment\",
         \"description\": \"Description courte\",
         \"importance\": \"Pourquoi ce moment est important\"
       }}
     ]
   }}

Transcription :
{transcript}",
        lang = lang.display_name(),
        transcript = transcript,
    )
}

pub fn enhance_prompt(transcript: &str, lang: Language) -> String {
    format!(
        "Améliore cette transcription brute de vidéo YouTube pour la rendre plus lisible et \
professionnelle.

Instructions spécifiques :
1. Corrige la grammaire et la ponctuation en {lang}
2. Organise le texte en paragraphes logiques
3. Ajoute des marqueurs de structure (introduction, développement, conclusion)
4. Conserve le sens original mais améliore la clarté
5. Formate la sortie en JSON avec cette structure :
   {{
     \"enhancedTranscript\": \"Le texte amélioré\",
     \"sections\": [\"Liste des sections principales\"],
     \"readabilityScore\": \"Score de lisibilité sur 10\"
   }}

Transcription originale :
{transcript}",
        lang = lang.display_name(),
        transcript = transcript,
    )
}

pub fn comments_prompt(transcript: &str, lang: Language) -> String {
    format!(
        "En te basant sur le contenu de cette vidéo, génère et analyse des commentaires pertinents.

Instructions spécifiques :
1. Génère 5 commentaires réalistes qui pourraient apparaître sous cette vidéo, en {lang}
2. Pour chaque commentaire :
   - Crée un nom d'utilisateur réaliste
   - Ajoute un nombre de likes plausible
   - Évalue sa pertinence
3. Formate la sortie en JSON avec cette structure :
   {{
     \"topComments\": [
       {{
         \"username\": \"nom_utilisateur\",
         \"comment\": \"texte du commentaire\",
         \"likes\": 42,
         \"relevance\": \"score de pertinence sur 10\"
       }}
     ],
     \"analysisInsights\": \"aperçu global des réactions\"
   }}

Contenu de la vidéo :
{transcript}",
        lang = lang.display_name(),
        transcript = transcript,
    )
}

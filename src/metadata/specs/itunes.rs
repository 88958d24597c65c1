// iTunes (MP4 ilst) atom keys

/// Identifier key space for iTunes short atoms.
pub(super) const ID_PREFIX: &str = "itsk/";

pub(super) const ATOMS: &[(&str, &str)] = &[
    ("©alb", "Album"),
    ("©ART", "Artist"),
    ("©cmt", "User Comment"),
    ("covr", "Cover Art"),
    ("cprt", "Copyright"),
    ("©day", "Release Date"),
    ("©enc", "Encoded By"),
    ("gnre", "Predefined Genre"),
    ("©gen", "User Genre"),
    ("©nam", "Song Name"),
    ("©st3", "Track Sub Title"),
    ("©too", "Encoding Tool"),
    ("©wrt", "Composer"),
    ("aART", "Album Artist"),
    ("akID", "Account Kind"),
    ("apID", "Apple ID"),
    ("atID", "Artist ID"),
    ("cnID", "Song ID"),
    ("cpil", "Disc Compilation"),
    ("disk", "Disc Number"),
    ("geID", "Genre ID"),
    ("grup", "Grouping"),
    ("©grp", "Grouping"),
    ("plID", "Playlist ID"),
    ("rtng", "Content Rating"),
    ("tmpo", "Beats Per Min"),
    ("trkn", "Track Number"),
    ("©ard", "Art Director"),
    ("©arg", "Arranger"),
    ("©aut", "Author"),
    ("©lyr", "Lyrics"),
    ("©cak", "Acknowledgement"),
    ("©con", "Conductor"),
    ("©des", "Description"),
    ("desc", "Description"),
    ("ldes", "Long Description"),
    ("©dir", "Director"),
    ("©equ", "EQ"),
    ("©lnt", "Liner Notes"),
    ("©mak", "Record Company"),
    ("©ope", "Original Artist"),
    ("©phg", "Phonogram Rights"),
    ("©prd", "Producer"),
    ("©prf", "Performer"),
    ("©pub", "Publisher"),
    ("©sne", "Sound Engineer"),
    ("©sol", "Soloist"),
    ("©src", "Credits"),
    ("©thx", "Thanks"),
    ("©url", "Online Extras"),
    ("©xpd", "Exec Producer"),
    ("pgap", "Gapless Playback"),
    ("stik", "Media Type"),
    ("soal", "Album Sort Order"),
    ("soar", "Artist Sort Order"),
    ("soaa", "Album Artist Sort Order"),
    ("soco", "Composer Sort Order"),
    ("sonm", "Title Sort Order"),
    ("tvsh", "TV Show"),
    ("pcst", "Podcast"),
];

/// Identifier form of an atom key: "©alb" -> "itsk/%A9alb".
pub(super) fn identifier(key: &str) -> String {
    format!("{}{}", ID_PREFIX, key.replace('©', "%A9"))
}
